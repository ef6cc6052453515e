use serde::Deserialize;
use serde::Serialize;

/// `Datos_de_INGC011_CAT_INDICADORECONOMIC` — the indicator document the
/// BCCR embeds, escaped, inside the SOAP result string. One observation
/// per published day; a single-day request carries at most one.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct IndicatorSeries {
    #[serde(rename = "INGC011_CAT_INDICADORECONOMIC", default)]
    pub observations: Vec<Observation>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Observation {
    #[serde(rename = "COD_INDICADORINTERNO", default)]
    pub indicator: String,
    #[serde(rename = "DES_FECHA", default)]
    pub date: String,
    #[serde(rename = "NUM_VALOR", default)]
    pub value: String,
}
