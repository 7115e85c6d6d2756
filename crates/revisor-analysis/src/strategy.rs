//! Prompt strategies for the comparison request
//!
//! A strategy is a pure function from (reference, normalized record,
//! document text) to the request text. All strategies share the same
//! load-bearing pieces (the categorical vocabularies, the error-reporting
//! criteria and the mandatory response contract) and differ only in
//! instructional framing. The set is closed: selection happens through
//! [`PromptStrategy::from_str`], and an unknown key is a fatal
//! per-document failure.

use crate::error::AnalysisError;
use revisor_domain::field::{
    CAPTAINCIES, DEFERMENT_FORMS, DEFERMENT_OUTCOMES, LAND_HISTORIES, PETITION_TYPES,
    SAME_MEASURE_VALUES,
};
use revisor_domain::NormalizedRecord;
use std::collections::BTreeMap;
use std::str::FromStr;

/// System role text for the comparison pass.
pub const ANALYST_SYSTEM_PROMPT: &str =
    "Você é um historiador especializado em documentos coloniais da América portuguesa.";

/// The closed set of prompt strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptStrategy {
    /// Rules-first framing: analysis criteria stated up front.
    Rules,
    /// Exemplar-based framing: two worked examples precede the data.
    Exemplar,
    /// Chain-of-reasoning framing: a stepwise analysis scaffold.
    Reasoning,
    /// Confidence-annotated framing: internal confidence levels per finding.
    Confidence,
}

impl PromptStrategy {
    /// Every registered strategy.
    pub const ALL: &'static [PromptStrategy] = &[
        PromptStrategy::Rules,
        PromptStrategy::Exemplar,
        PromptStrategy::Reasoning,
        PromptStrategy::Confidence,
    ];

    /// Stable key, persisted as `prompt_name` on every record the strategy
    /// produces.
    pub fn key(&self) -> &'static str {
        match self {
            PromptStrategy::Rules => "rules",
            PromptStrategy::Exemplar => "exemplar",
            PromptStrategy::Reasoning => "reasoning",
            PromptStrategy::Confidence => "confidence",
        }
    }

    /// Render the comparison request for one document.
    pub fn render(
        &self,
        reference: &str,
        record: &NormalizedRecord,
        document_text: &str,
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str(ROLE);
        prompt.push('\n');
        prompt.push_str(TASK);
        prompt.push('\n');

        match self {
            PromptStrategy::Rules => {}
            PromptStrategy::Exemplar => {
                prompt.push_str(EXEMPLARS);
                prompt.push('\n');
            }
            PromptStrategy::Reasoning => {
                prompt.push_str(REASONING_SCAFFOLD);
                prompt.push('\n');
            }
            PromptStrategy::Confidence => {
                prompt.push_str(CONFIDENCE_LEVELS);
                prompt.push('\n');
            }
        }

        prompt.push_str(&data_block(reference, record, document_text));
        prompt.push('\n');
        prompt.push_str(&categorical_block());
        prompt.push('\n');
        prompt.push_str(ERROR_CRITERIA);
        prompt.push('\n');
        prompt.push_str(RESPONSE_CONTRACT);

        prompt
    }
}

impl FromStr for PromptStrategy {
    type Err = AnalysisError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|s| s.key() == key)
            .copied()
            .ok_or_else(|| AnalysisError::UnknownStrategy(key.to_string()))
    }
}

/// Truncate to a character budget without splitting a multi-byte character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Render the normalized record as pretty JSON keyed by catalog labels.
fn record_json(record: &NormalizedRecord) -> String {
    let map: BTreeMap<&str, &str> = record.iter().map(|(f, v)| (f.label(), v)).collect();
    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
}

fn data_block(reference: &str, record: &NormalizedRecord, document_text: &str) -> String {
    format!(
        "## DADOS\n\
         **Referência**: {}\n\n\
         **Dados Catalogados**:\n{}\n\n\
         **Conteúdo Original da Carta**:\n{}\n",
        reference,
        record_json(record),
        document_text
    )
}

fn categorical_block() -> String {
    let json = |values: &[&str]| serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string());
    format!(
        "## CAMPOS CATEGÓRICOS (valores exatos)\n\
         - \"Tipo de petição\": {}\n\
         - \"Solicitaram repartição da terra\": {}\n\
         - \"Capitania onde mora\": {}\n\
         - \"Histórico da terra\": {}\n\
         - \"Despacho favorável\": {}\n\
         - \"Forma de Deferimento\": {}\n",
        json(PETITION_TYPES),
        json(SAME_MEASURE_VALUES),
        json(CAPTAINCIES),
        json(LAND_HISTORIES),
        json(DEFERMENT_OUTCOMES),
        json(DEFERMENT_FORMS),
    )
}

const ROLE: &str = "## PAPEL\n\
Você é um especialista em análise de documentos históricos do período colonial \
brasileiro, com profundo conhecimento sobre cartas de sesmaria e seus processos \
de catalogação.\n";

const TASK: &str = "## TAREFA\n\
Analise cuidadosamente o texto original da carta de sesmaria e os dados \
catalogados na plataforma. Identifique e liste todas as divergências encontradas \
entre o conteúdo original e os dados catalogados.\n";

const ERROR_CRITERIA: &str = "## CRITÉRIOS PARA ERROS\n\
REPORTAR SOMENTE SE:\n\
- Datas com dia/mês/ano diferentes\n\
- Localidades geográficas distintas\n\
- Nomes de proprietários radicalmente diferentes\n\
\n\
IGNORAR:\n\
- Variações de formato de data\n\
- Grafias alternativas\n\
- Ordem de elementos em listas\n";

const RESPONSE_CONTRACT: &str = "## FORMATO DE RESPOSTA (OBRIGATÓRIO)\n\
{\n\
    \"erros\": [\n\
        {\n\
            \"campo\": \"nome_do_campo\",\n\
            \"valor_incorreto\": \"valor_atual\",\n\
            \"valor_correto\": \"valor_sugerido\",\n\
            \"motivo\": \"explicacao_historica\"\n\
        }\n\
    ]\n\
}\n\
\n\
Se não houver divergências, retorne uma lista vazia para \"erros\".\n";

const EXEMPLARS: &str = "## EXEMPLOS\n\
Aqui estão alguns exemplos de análises anteriores:\n\
\n\
Exemplo 1:\n\
Texto original: \"Aos vinte dias do mês de março de 1732, na cidade de Olinda, \
capitania de Pernambuco, foi concedida sesmaria a João da Silva...\"\n\
Dados catalogados: \"owner_name\": \"João Silva\", \"dateConcession\": \
\"20-03-1733\", \"captaincy_name\": \"Pernambuco\"\n\
Análise:\n\
{\n\
    \"erros\": [\n\
        {\n\
            \"campo\": \"owner_name\",\n\
            \"valor_incorreto\": \"João Silva\",\n\
            \"valor_correto\": \"João da Silva\",\n\
            \"motivo\": \"O texto original menciona 'João da Silva' com a \
preposição 'da' que está ausente na catalogação\"\n\
        },\n\
        {\n\
            \"campo\": \"dateConcession\",\n\
            \"valor_incorreto\": \"20-03-1733\",\n\
            \"valor_correto\": \"20-03-1732\",\n\
            \"motivo\": \"O texto original indica o ano de 1732, não 1733 como \
catalogado\"\n\
        }\n\
    ]\n\
}\n\
\n\
Exemplo 2:\n\
Texto original: \"...terras devolutas nunca povoadas na Ribeira do Açu...\"\n\
Dados catalogados: \"landhistory_history\": \"Devoluta por abandono\", \
\"landrecord_river\": \"Açu\"\n\
Análise:\n\
{\n\
    \"erros\": [\n\
        {\n\
            \"campo\": \"landhistory_history\",\n\
            \"valor_incorreto\": \"Devoluta por abandono\",\n\
            \"valor_correto\": \"Devoluta nunca povoada\",\n\
            \"motivo\": \"O texto especifica 'terras devolutas nunca povoadas', \
indicando que nunca foram ocupadas, não que foram abandonadas\"\n\
        }\n\
    ]\n\
}\n";

const REASONING_SCAFFOLD: &str = "## PROCESSO DE ANÁLISE\n\
Para realizar esta tarefa com precisão, siga este processo de raciocínio:\n\
\n\
1. Primeiro, identifique no texto original todas as informações relevantes \
para catalogação:\n\
   - Nomes de pessoas (sesmeiros, autoridades)\n\
   - Datas (concessão, confirmação)\n\
   - Localizações (capitania, localidade, rios)\n\
   - Características da terra (histórico, confrontantes)\n\
   - Processo administrativo (tipo de petição, deferimento)\n\
\n\
2. Em seguida, compare cada informação identificada com o campo \
correspondente nos dados catalogados:\n\
   - Verifique a grafia exata dos nomes\n\
   - Confirme se as datas estão corretas (dia, mês e ano)\n\
   - Valide se as categorias selecionadas correspondem ao texto\n\
   - Certifique-se de que não há omissões de informações presentes no texto\n\
\n\
3. Para cada divergência encontrada:\n\
   - Identifique o campo específico\n\
   - Registre o valor atual catalogado\n\
   - Determine o valor correto conforme o texto original\n\
   - Explique brevemente a natureza da divergência\n\
\n\
4. Finalmente, avalie o impacto geral das divergências na qualidade da \
catalogação.\n";

const CONFIDENCE_LEVELS: &str = "## NÍVEIS DE CONFIANÇA\n\
Para cada divergência identificada, considere internamente um nível de \
confiança:\n\
- **Alta**: Evidência clara e inequívoca no texto original\n\
- **Média**: Evidência presente, mas com alguma ambiguidade\n\
- **Baixa**: Evidência indireta ou baseada em inferência\n\
\n\
Reporte somente divergências com confiança Alta ou Média.\n";
