use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::indicador::IndicatorSeries;

/// Historic endpoint of the BCCR "Indicadores Económicos" web service.
pub const DEFAULT_ENDPOINT: &str = "https://indicadoreseconomicos.bccr.fi.cr/indicadoreseconomicos/WebServices/wsIndicadoresEconomicos.asmx";

const SOAP_ACTION: &str = "http://ws.sdde.bccr.fi.cr/ObtenerIndicadoresEconomicosXML";

/// Indicator catalogs for the CRC/USD reference exchange rate.
///
/// Catalog ids are published at
/// https://www.bccr.fi.cr/seccion-indicadores-economicos/servicio-web
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// 317 — tipo de cambio de compra (buying rate).
    Buy,
    /// 318 — tipo de cambio de venta (selling rate).
    Sell,
}

impl Indicator {
    pub fn catalog(self) -> u32 {
        match self {
            Indicator::Buy => 317,
            Indicator::Sell => 318,
        }
    }
}

/// Anything that can answer "what did this indicator publish for this date".
///
/// The production implementation is [`BccrClient`]; jobs depend on the
/// trait so they can run against canned quotes in tests.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Returns the published value, `None` when the service has no
    /// observation for the date.
    async fn indicator_value(
        &self,
        indicator: Indicator,
        date: NaiveDate,
    ) -> Result<Option<Decimal>>;
}

/// SOAP 1.1 client for `ObtenerIndicadoresEconomicosXML`.
pub struct BccrClient {
    http: Client,
    endpoint: String,
    requester: String,
}

impl BccrClient {
    pub fn new(endpoint: String, requester: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            requester,
        })
    }
}

#[async_trait]
impl QuoteSource for BccrClient {
    async fn indicator_value(
        &self,
        indicator: Indicator,
        date: NaiveDate,
    ) -> Result<Option<Decimal>> {
        let request = soap_request(indicator, date, &self.requester);
        let response = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }
        let envelope = response.text().await?;
        let document = extract_result(&envelope)?;
        first_value(indicator, &document)
    }
}

/// The service expects request dates as dd/mm/yyyy.
fn format_request_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn soap_request(indicator: Indicator, date: NaiveDate, requester: &str) -> String {
    let day = format_request_date(date);
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <ObtenerIndicadoresEconomicosXML xmlns="http://ws.sdde.bccr.fi.cr">
      <tcIndicador>{catalog}</tcIndicador>
      <tcFechaInicio>{day}</tcFechaInicio>
      <tcFechaFinal>{day}</tcFechaFinal>
      <tcNombre>{requester}</tcNombre>
      <tnSubNiveles>N</tnSubNiveles>
    </ObtenerIndicadoresEconomicosXML>
  </soap:Body>
</soap:Envelope>"#,
        catalog = indicator.catalog(),
    )
}

/// Pulls the escaped indicator document out of the SOAP envelope.
///
/// Matched by local name so the response's namespace prefixes don't
/// matter.
fn extract_result(envelope: &str) -> Result<String> {
    let mut reader = Reader::from_str(envelope);
    loop {
        match reader.read_event()? {
            Event::Start(start)
                if start.local_name().as_ref() == b"ObtenerIndicadoresEconomicosXMLResult" =>
            {
                let text = reader.read_text(start.name())?;
                return Ok(text.into_owned());
            }
            Event::Eof => {
                return Err(Error::MissingElement(
                    "ObtenerIndicadoresEconomicosXMLResult",
                ));
            }
            _ => {}
        }
    }
}

/// First published value in the document, `None` when the series is empty.
fn first_value(indicator: Indicator, document: &str) -> Result<Option<Decimal>> {
    if document.trim().is_empty() {
        return Ok(None);
    }
    let series: IndicatorSeries = quick_xml::de::from_str(document)?;
    let Some(observation) = series.observations.first() else {
        return Ok(None);
    };
    let value = observation.value.trim();
    log::debug!(
        "indicator {} published {value} for {}",
        observation.indicator,
        observation.date
    );
    Decimal::from_str(value).map(Some).map_err(|_| Error::BadValue {
        indicator: indicator.catalog(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <soap:Body>
    <ObtenerIndicadoresEconomicosXMLResponse xmlns="http://ws.sdde.bccr.fi.cr">
      <ObtenerIndicadoresEconomicosXMLResult>&lt;Datos_de_INGC011_CAT_INDICADORECONOMIC&gt;&lt;INGC011_CAT_INDICADORECONOMIC&gt;&lt;COD_INDICADORINTERNO&gt;318&lt;/COD_INDICADORINTERNO&gt;&lt;DES_FECHA&gt;2026-08-27T00:00:00-06:00&lt;/DES_FECHA&gt;&lt;NUM_VALOR&gt;555.00000000&lt;/NUM_VALOR&gt;&lt;/INGC011_CAT_INDICADORECONOMIC&gt;&lt;/Datos_de_INGC011_CAT_INDICADORECONOMIC&gt;</ObtenerIndicadoresEconomicosXMLResult>
    </ObtenerIndicadoresEconomicosXMLResponse>
  </soap:Body>
</soap:Envelope>"#;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
    }

    #[test]
    fn request_dates_use_day_month_year() {
        assert_eq!(format_request_date(day()), "27/08/2026");
    }

    #[test]
    fn request_carries_indicator_and_date_range() {
        let request = soap_request(Indicator::Buy, day(), "acme");
        assert!(request.contains("<tcIndicador>317</tcIndicador>"));
        assert!(request.contains("<tcFechaInicio>27/08/2026</tcFechaInicio>"));
        assert!(request.contains("<tcFechaFinal>27/08/2026</tcFechaFinal>"));
        assert!(request.contains("<tcNombre>acme</tcNombre>"));
        assert!(request.contains("<tnSubNiveles>N</tnSubNiveles>"));

        let request = soap_request(Indicator::Sell, day(), "acme");
        assert!(request.contains("<tcIndicador>318</tcIndicador>"));
    }

    #[test]
    fn extracts_the_escaped_document() {
        let document = extract_result(RESPONSE).unwrap();
        assert!(document.starts_with("<Datos_de_INGC011_CAT_INDICADORECONOMIC>"));
        assert!(document.contains("<NUM_VALOR>555.00000000</NUM_VALOR>"));
    }

    #[test]
    fn envelope_without_result_is_an_error() {
        let err = extract_result("<soap:Envelope><soap:Body/></soap:Envelope>").unwrap_err();
        assert!(matches!(err, Error::MissingElement(_)));
    }

    #[test]
    fn reads_the_first_published_value() {
        let document = extract_result(RESPONSE).unwrap();
        let value = first_value(Indicator::Sell, &document).unwrap();
        assert_eq!(value, Some(Decimal::from(555)));
    }

    #[test]
    fn picks_the_first_node_when_several_are_published() {
        let document = "<Datos_de_INGC011_CAT_INDICADORECONOMIC>\
                        <INGC011_CAT_INDICADORECONOMIC><NUM_VALOR>500.5</NUM_VALOR></INGC011_CAT_INDICADORECONOMIC>\
                        <INGC011_CAT_INDICADORECONOMIC><NUM_VALOR>501.5</NUM_VALOR></INGC011_CAT_INDICADORECONOMIC>\
                        </Datos_de_INGC011_CAT_INDICADORECONOMIC>";
        let value = first_value(Indicator::Buy, document).unwrap();
        assert_eq!(value, Some(Decimal::from_str("500.5").unwrap()));
    }

    #[test]
    fn empty_series_means_nothing_published() {
        let document =
            "<Datos_de_INGC011_CAT_INDICADORECONOMIC></Datos_de_INGC011_CAT_INDICADORECONOMIC>";
        assert_eq!(first_value(Indicator::Buy, document).unwrap(), None);
        assert_eq!(first_value(Indicator::Buy, "").unwrap(), None);
    }

    #[test]
    fn non_numeric_value_is_an_error() {
        let document = "<Datos_de_INGC011_CAT_INDICADORECONOMIC>\
                        <INGC011_CAT_INDICADORECONOMIC><NUM_VALOR>n/a</NUM_VALOR></INGC011_CAT_INDICADORECONOMIC>\
                        </Datos_de_INGC011_CAT_INDICADORECONOMIC>";
        let err = first_value(Indicator::Sell, document).unwrap_err();
        assert!(matches!(err, Error::BadValue { indicator: 318, .. }));
    }
}
