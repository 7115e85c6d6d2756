//! Canonical field set and the raw-source mapping table

use std::fmt;

/// Field name sentinel used for pipeline-failure bookkeeping records.
///
/// A persisted [`crate::ErrorRecord`] whose `campo` is this value describes a
/// processing failure, not a catalog discrepancy.
pub const SYSTEM_FIELD: &str = "sistema";

/// The closed set of canonical catalog attributes.
///
/// Every component downstream of normalization speaks in these fields. The
/// display label (via [`CanonicalField::label`]) is the Portuguese catalog
/// label the external platform uses; [`CanonicalField::parse`] also accepts
/// any raw source key from [`FIELD_MAPPING`], since the generation capability
/// may echo either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum CanonicalField {
    TipoPeticao,
    ReferenciaAntiga,
    Nome,
    MesmaMedida,
    Capitania,
    HistoricoTerra,
    DataPeticao,
    DataConcessao,
    ObservacoesSesmaria,
    Localidade,
    MarcosGeograficos,
    Ribeira,
    Confrontantes,
    ObservacoesPeticao,
    Justificativas,
    ExigenciasDeferimento,
    TotalSesmeiros,
    ObservacoesJustificativas,
    Fonte,
    ObservacoesDeferimento,
    ObservacoesExigencias,
    DespachoFavoravel,
    FormaDeferimento,
    NomeProvedor,
    NomeProcurador,
    /// Traceability key: the source reference copied into every
    /// [`crate::NormalizedRecord`].
    Referencia,
}

/// Mapping from raw external catalog keys to canonical fields.
///
/// Raw keys are external and unstable; matching is case-insensitive and the
/// first entry in this table wins when several raw keys collide. Several raw
/// keys intentionally share a target (the external API exposes the same
/// attribute under more than one name).
pub const FIELD_MAPPING: &[(&str, CanonicalField)] = &[
    ("request_petition_type", CanonicalField::TipoPeticao),
    ("request_old_reference", CanonicalField::ReferenciaAntiga),
    ("owner_name", CanonicalField::Nome),
    ("request_same_measure", CanonicalField::MesmaMedida),
    ("captaincy_name", CanonicalField::Capitania),
    ("landhistory_history", CanonicalField::HistoricoTerra),
    ("requesttype_type", CanonicalField::TipoPeticao),
    ("request_date_request", CanonicalField::DataPeticao),
    ("dateConcession", CanonicalField::DataConcessao),
    ("landrecord_comments", CanonicalField::ObservacoesSesmaria),
    ("landrecord_location", CanonicalField::Localidade),
    ("landrecord_marcos", CanonicalField::MarcosGeograficos),
    ("landrecord_river", CanonicalField::Ribeira),
    ("landrecord_limitant", CanonicalField::Confrontantes),
    ("request_comments", CanonicalField::ObservacoesPeticao),
    ("justifications", CanonicalField::Justificativas),
    ("demands", CanonicalField::ExigenciasDeferimento),
    ("countOwners", CanonicalField::TotalSesmeiros),
    ("comments", CanonicalField::ObservacoesPeticao),
    ("limitant", CanonicalField::Confrontantes),
    ("comments_justification", CanonicalField::ObservacoesJustificativas),
    ("sources", CanonicalField::Fonte),
    ("comments_deferment", CanonicalField::ObservacoesDeferimento),
    ("comments_demands", CanonicalField::ObservacoesExigencias),
    ("defermentFavorable", CanonicalField::DespachoFavoravel),
    ("defermentForm", CanonicalField::FormaDeferimento),
    ("providerName", CanonicalField::NomeProvedor),
    ("procuradorName", CanonicalField::NomeProcurador),
];

/// Allowed values for the petition-type categorical field.
pub const PETITION_TYPES: &[&str] = &["concessão", "Não encontrado"];

/// Allowed values for the same-measure repartition flag.
pub const SAME_MEASURE_VALUES: &[&str] = &["sim", "não", "true", "false"];

/// Allowed values for the captaincy (historical province) field.
pub const CAPTAINCIES: &[&str] = &[
    "Alagoas",
    "Bahia",
    "Ceará",
    "Colonia do Sacramento",
    "Espírito Santo",
    "Goias",
    "Itamaracá",
    "Maranhão",
    "Mato Grosso do Sul",
    "Minas Gerais",
    "NA",
    "Pará",
    "Paraíba",
    "Pernambuco",
    "Pernambuco/Alagoas",
    "Pernambuco/Piauí",
    "Piauí",
    "Rio de Janeiro",
    "Rio Grande do Norte",
    "Rio Grande do Sul",
    "Rio Negro",
    "Santa Catarina",
    "São Paulo",
    "São Paulo/Rio de Janeiro",
    "Sergipe",
];

/// Allowed values for the land-history categorical field.
pub const LAND_HISTORIES: &[&str] = &[
    "Comprada",
    "Devoluta nunca povoada",
    "Devoluta por abandono",
    "Herdada",
    "NA",
    "Primordial",
];

/// Allowed values for the deferment-outcome categorical field.
pub const DEFERMENT_OUTCOMES: &[&str] = &["Sim", "Não", "Parcial", "NC", "NA"];

/// Allowed values for the deferment-form categorical field.
pub const DEFERMENT_FORMS: &[&str] = &[
    "provisão",
    "Carta Régia",
    "NC",
    "NA",
    "Carta de doação",
    "Alvará",
    "Ordem Régia",
];

impl CanonicalField {
    /// All canonical fields, in declaration order.
    pub const ALL: &'static [CanonicalField] = &[
        CanonicalField::TipoPeticao,
        CanonicalField::ReferenciaAntiga,
        CanonicalField::Nome,
        CanonicalField::MesmaMedida,
        CanonicalField::Capitania,
        CanonicalField::HistoricoTerra,
        CanonicalField::DataPeticao,
        CanonicalField::DataConcessao,
        CanonicalField::ObservacoesSesmaria,
        CanonicalField::Localidade,
        CanonicalField::MarcosGeograficos,
        CanonicalField::Ribeira,
        CanonicalField::Confrontantes,
        CanonicalField::ObservacoesPeticao,
        CanonicalField::Justificativas,
        CanonicalField::ExigenciasDeferimento,
        CanonicalField::TotalSesmeiros,
        CanonicalField::ObservacoesJustificativas,
        CanonicalField::Fonte,
        CanonicalField::ObservacoesDeferimento,
        CanonicalField::ObservacoesExigencias,
        CanonicalField::DespachoFavoravel,
        CanonicalField::FormaDeferimento,
        CanonicalField::NomeProvedor,
        CanonicalField::NomeProcurador,
        CanonicalField::Referencia,
    ];

    /// The catalog display label for this field.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::TipoPeticao => "Tipo de petição",
            CanonicalField::ReferenciaAntiga => "Referência da antiga plataforma SILB",
            CanonicalField::Nome => "Nome",
            CanonicalField::MesmaMedida => {
                "Solicitaram repartição da terra em mesma medida"
            }
            CanonicalField::Capitania => "Capitania onde mora",
            CanonicalField::HistoricoTerra => "Histórico da terra",
            CanonicalField::DataPeticao => "Data da petição",
            CanonicalField::DataConcessao => "Data da concessão",
            CanonicalField::ObservacoesSesmaria => "Observações da sesmaria",
            CanonicalField::Localidade => "Localidade",
            CanonicalField::MarcosGeograficos => "Marcos Geográficos",
            CanonicalField::Ribeira => "Ribeira",
            CanonicalField::Confrontantes => "Confrontantes",
            CanonicalField::ObservacoesPeticao => "Observações da petição",
            CanonicalField::Justificativas => "Justificativas",
            CanonicalField::ExigenciasDeferimento => "Exigências do Deferimento",
            CanonicalField::TotalSesmeiros => {
                "Total de sesmeiros que solicitaram a sesmaria"
            }
            CanonicalField::ObservacoesJustificativas => "Observações das Justificativas",
            CanonicalField::Fonte => "Fonte",
            CanonicalField::ObservacoesDeferimento => {
                "Observações do deferimento e da concessão"
            }
            CanonicalField::ObservacoesExigencias => "Observações das exigências",
            CanonicalField::DespachoFavoravel => "Despacho favorável",
            CanonicalField::FormaDeferimento => "Forma de Deferimento",
            CanonicalField::NomeProvedor => "Nome do provedor",
            CanonicalField::NomeProcurador => "Nome do procurador",
            CanonicalField::Referencia => "referencia",
        }
    }

    /// Whether this is a date-valued field (subject to the optional
    /// date-equivalence post-filter).
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            CanonicalField::DataPeticao | CanonicalField::DataConcessao
        )
    }

    /// Resolve a field name the generation capability may have produced.
    ///
    /// Accepts, case-insensitively, either the display label or any raw
    /// source key from [`FIELD_MAPPING`]. Returns `None` for names outside
    /// the canonical set.
    pub fn parse(name: &str) -> Option<CanonicalField> {
        let name = name.trim();
        for field in Self::ALL {
            if field.label().eq_ignore_ascii_case(name) {
                return Some(*field);
            }
        }
        for (raw, field) in FIELD_MAPPING {
            if raw.eq_ignore_ascii_case(name) {
                return Some(*field);
            }
        }
        None
    }

    /// The essential fields a complete catalog record carries (everything
    /// except the traceability reference).
    pub fn essential() -> impl Iterator<Item = CanonicalField> {
        Self::ALL
            .iter()
            .copied()
            .filter(|f| *f != CanonicalField::Referencia)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
