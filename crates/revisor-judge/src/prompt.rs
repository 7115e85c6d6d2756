//! Re-evaluation prompt for the judge pass

use revisor_domain::ErrorRecord;

/// System role text for the judge pass.
pub const JUDGE_SYSTEM_PROMPT: &str =
    "Você é um especialista em documentos históricos da América portuguesa.";

/// Build the re-evaluation prompt for one open error record.
///
/// Embeds the original field, catalogued value, suggested correction and
/// rationale, plus the document text (already truncated by the caller), and
/// demands the judge verdict contract.
pub fn judgment_prompt(erro: &ErrorRecord, document_text: &str) -> String {
    format!(
        "Reavalie este possível erro de catalogação:\n\
         \n\
         **Dados do Erro**:\n\
         - Reference: {reference}\n\
         - Campo: {campo}\n\
         - Valor Catalogado: {catalogado}\n\
         - Sugestão de Correção: {sugestao}\n\
         - Motivo: {motivo}\n\
         \n\
         **Conteúdo Original da Carta**:\n\
         {documento}\n\
         \n\
         **Sua Tarefa**:\n\
         1. Verifique se a correção sugerida está correta\n\
         2. Caso não esteja, indique o valor correto\n\
         3. Atribua um grau de certeza (0.0 a 1.0)\n\
         4. Indique se alguma correção é de fato necessária\n\
         \n\
         **Formato de Resposta**:\n\
         {{\n\
             \"analise\": \"Explicação detalhada\",\n\
             \"valor_correto_final\": \"valor corrigido ou confirmado\",\n\
             \"grau_certeza\": 0.95,\n\
             \"correcao_necessaria\": true\n\
         }}\n",
        reference = erro.reference,
        campo = erro.campo,
        catalogado = erro.conteudo_errado,
        sugestao = erro.resposta_correta.as_deref().unwrap_or("N/A"),
        motivo = erro.motivo,
        documento = document_text,
    )
}
