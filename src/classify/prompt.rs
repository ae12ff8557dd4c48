//! Fixed instruction prompt sent with every classification run.
//!
//! The tolerance table is advisory context for the remote model; nothing
//! here is evaluated locally.

/// Maximum admissible temperature (MTA) per component class, in °C,
/// per NBR 16818 / NBR 15572.
pub const TOLERANCE_TABLE: &[(&str, u32)] = &[
    ("Fios encapados / Cabos isolados", 70),
    ("Régua de borne / Conexões", 70),
    ("Conexões e barramentos de baixa tensão", 90),
    ("Fusíveis (corpo)", 100),
    ("Seccionadoras", 90),
    ("Transformadores a óleo (óleo)", 65),
    ("Transformadores a óleo (núcleo)", 80),
];

/// The fixed instruction text: task, tolerance table, status criteria,
/// and the JSON-only response requirement.
pub fn instruction() -> String {
    let mut table = String::new();
    for (component, mta) in TOLERANCE_TABLE {
        table.push_str(&format!("    - {component}: {mta}°C\n"));
    }

    format!(
        r#"Você é um especialista sênior em termografia industrial certificado Nível 3.
Sua tarefa é analisar as imagens termográficas fornecidas e gerar um relatório técnico preciso.

CRITÉRIOS TÉCNICOS (NBR 16818 / NBR 15572):
Utilize os seguintes limites de Máxima Temperatura Admissível (MTA) para classificar a severidade:
{table}
CLASSIFICAÇÃO DE STATUS:
- OK: Temperatura abaixo da MTA.
- ALERTA: Temperatura próxima da MTA (margem de segurança de 10°C).
- CRÍTICO: Temperatura igual ou superior à MTA.

INSTRUÇÕES DE RESPOSTA:
1. Identifique a temperatura máxima em cada imagem.
2. Compare com a MTA do componente identificado.
3. Forneça uma descrição técnica do que foi observado.
4. Forneça uma recomendação clara de manutenção.
5. Retorne estritamente em formato JSON.
6. Use o ID fornecido para cada imagem.
"#
    )
}

/// Per-image label that ties each payload to its record identifier.
pub fn image_label(id: &str) -> String {
    format!("Analisar Imagem ID: {id}")
}
