use crate::domain::model::{HttpMethod, HttpRequest, ItemParameters, QueryRequest};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// 解析日期類字串並輸出 UTC 的 YYYY-MM-DD，時間部分直接截掉
pub fn normalize_date(parameter: &str, raw: &str) -> Result<String> {
    let value = raw.trim();

    parse_utc_date(value)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| EtlError::InvalidDateError {
            parameter: parameter.to_string(),
            value: raw.to_string(),
        })
}

fn parse_utc_date(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }

    // 帶時區的時間戳先換成 UTC 再截斷
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    // 沒有時區的一律當作 UTC
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

impl QueryRequest {
    pub fn from_parameters(params: &ItemParameters) -> Result<Self> {
        let start_date = if params.desde.is_empty() {
            None
        } else {
            Some(normalize_date("desde", &params.desde)?)
        };

        let end_date = if params.hasta.is_empty() {
            None
        } else {
            Some(normalize_date("hasta", &params.hasta)?)
        };

        Ok(Self {
            variable_id: params.id_variable,
            start_date,
            end_date,
            // limit = 0 不送出
            limit: (params.limit != 0).then_some(params.limit),
            offset: params.offset,
        })
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(desde) = &self.start_date {
            pairs.push(("desde".to_string(), desde.clone()));
        }
        if let Some(hasta) = &self.end_date {
            pairs.push(("hasta".to_string(), hasta.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }

        pairs
    }

    pub fn endpoint(&self, base_url: &str) -> String {
        format!(
            "{}/monetarias/{}",
            base_url.trim_end_matches('/'),
            self.variable_id
        )
    }

    /// BCRA 的憑證鏈常有問題，這個端點固定略過 TLS 驗證
    pub fn to_http_request(&self, base_url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint(base_url),
            query: self.to_query_pairs(),
            json: true,
            skip_tls_verification: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ItemParameters {
        ItemParameters::default()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_normalize_date_truncates_timestamp() {
        assert_eq!(
            normalize_date("desde", "2024-03-15T10:30:00Z").unwrap(),
            "2024-03-15"
        );
        assert_eq!(
            normalize_date("desde", "2024-03-15T10:30:00.000Z").unwrap(),
            "2024-03-15"
        );
    }

    #[test]
    fn test_normalize_date_is_idempotent() {
        let once = normalize_date("hasta", "2024-03-15").unwrap();
        let twice = normalize_date("hasta", &once).unwrap();
        assert_eq!(once, "2024-03-15");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_date_converts_offset_to_utc() {
        assert_eq!(
            normalize_date("desde", "2024-03-15T23:30:00-03:00").unwrap(),
            "2024-03-16"
        );
        assert_eq!(
            normalize_date("desde", "2024-03-15T23:30:00-0300").unwrap(),
            "2024-03-16"
        );
    }

    #[test]
    fn test_normalize_date_other_formats() {
        assert_eq!(
            normalize_date("desde", "2024-03-15 08:00:00").unwrap(),
            "2024-03-15"
        );
        assert_eq!(
            normalize_date("desde", "2024-03-15T08:00").unwrap(),
            "2024-03-15"
        );
        assert_eq!(normalize_date("desde", "2024/03/15").unwrap(), "2024-03-15");
        assert_eq!(
            normalize_date("desde", "Fri, 15 Mar 2024 10:30:00 +0000").unwrap(),
            "2024-03-15"
        );
    }

    #[test]
    fn test_normalize_date_rejects_garbage() {
        let err = normalize_date("desde", "not-a-date").unwrap_err();
        assert!(matches!(
            err,
            EtlError::InvalidDateError { ref parameter, ref value }
                if parameter == "desde" && value == "not-a-date"
        ));
        assert!(normalize_date("hasta", "2024-13-45").is_err());
    }

    #[test]
    fn test_empty_dates_are_omitted() {
        let query = QueryRequest::from_parameters(&params()).unwrap();
        let pairs = query.to_query_pairs();

        assert!(pairs.iter().all(|(k, _)| k != "desde" && k != "hasta"));
        assert_eq!(pairs, vec![pair("limit", "100"), pair("offset", "0")]);
    }

    #[test]
    fn test_limit_zero_is_omitted_offset_zero_is_kept() {
        let query = QueryRequest::from_parameters(&ItemParameters {
            limit: 0,
            offset: Some(0),
            ..params()
        })
        .unwrap();

        assert_eq!(query.limit, None);
        assert_eq!(query.to_query_pairs(), vec![pair("offset", "0")]);
    }

    #[test]
    fn test_unset_offset_is_omitted() {
        let query = QueryRequest::from_parameters(&ItemParameters {
            offset: None,
            ..params()
        })
        .unwrap();

        assert_eq!(query.to_query_pairs(), vec![pair("limit", "100")]);
    }

    #[test]
    fn test_full_query_order() {
        let query = QueryRequest::from_parameters(&ItemParameters {
            id_variable: 4,
            desde: "2024-01-01T00:00:00Z".to_string(),
            hasta: "2024-01-31".to_string(),
            limit: 10,
            offset: Some(20),
        })
        .unwrap();

        assert_eq!(
            query.to_query_pairs(),
            vec![
                pair("desde", "2024-01-01"),
                pair("hasta", "2024-01-31"),
                pair("limit", "10"),
                pair("offset", "20"),
            ]
        );
    }

    #[test]
    fn test_bad_end_date_is_hard_error() {
        let result = QueryRequest::from_parameters(&ItemParameters {
            hasta: "31/01/2024".to_string(),
            ..params()
        });

        assert!(matches!(
            result,
            Err(EtlError::InvalidDateError { ref parameter, .. }) if parameter == "hasta"
        ));
    }

    #[test]
    fn test_http_request_targets_variable_endpoint() {
        let query = QueryRequest::from_parameters(&ItemParameters {
            id_variable: 7,
            ..params()
        })
        .unwrap();
        let request = query.to_http_request("https://api.bcra.gob.ar/estadisticas/v4.0/");

        assert_eq!(
            request.url,
            "https://api.bcra.gob.ar/estadisticas/v4.0/monetarias/7"
        );
        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.json);
        assert!(request.skip_tls_verification);
    }
}
