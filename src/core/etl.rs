use crate::core::processor::BatchProcessor;
use crate::domain::model::OutputRecord;
use crate::domain::ports::{ConfigProvider, ParameterResolver, Storage, Transport};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

pub const JSON_OUTPUT_FILE: &str = "bcra_output.json";
pub const CSV_OUTPUT_FILE: &str = "bcra_output.csv";

#[derive(Debug, Clone)]
pub struct RunReport {
    pub records: Vec<OutputRecord>,
    pub error_count: usize,
    pub output_files: Vec<String>,
}

/// 執行整批處理後把輸出寫到 Storage
pub struct EtlEngine<T: Transport, S: Storage> {
    processor: BatchProcessor<T>,
    storage: S,
    output_path: String,
    output_formats: Vec<String>,
}

impl<T: Transport, S: Storage> EtlEngine<T, S> {
    pub fn new(processor: BatchProcessor<T>, storage: S) -> Self {
        Self {
            processor,
            storage,
            output_path: ".".to_string(),
            output_formats: vec!["json".to_string()],
        }
    }

    pub fn from_config<C: ConfigProvider>(transport: T, storage: S, config: &C) -> Self {
        let processor = BatchProcessor::new(transport)
            .with_base_url(config.base_url())
            .with_node_name(config.node_name())
            .with_continue_on_fail(config.continue_on_fail());

        Self {
            processor,
            storage,
            output_path: config.output_path().to_string(),
            output_formats: config.output_formats().to_vec(),
        }
    }

    pub fn with_output(mut self, output_path: impl Into<String>, formats: Vec<String>) -> Self {
        self.output_path = output_path.into();
        self.output_formats = formats;
        self
    }

    pub fn processor(&self) -> &BatchProcessor<T> {
        &self.processor
    }

    pub async fn run<R: ParameterResolver>(
        &self,
        item_count: usize,
        resolver: &R,
    ) -> Result<RunReport> {
        // Extract + transform
        let records = self.processor.execute(item_count, resolver).await?;
        let error_count = records.iter().filter(|r| r.is_error()).count();

        if error_count > 0 {
            tracing::warn!(
                "⚠️ {} of {} item(s) produced error records",
                error_count,
                item_count
            );
        }

        // Load
        let output_files = self.load(&records).await?;

        Ok(RunReport {
            records,
            error_count,
            output_files,
        })
    }

    async fn load(&self, records: &[OutputRecord]) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in &self.output_formats {
            let (filename, data) = match format.as_str() {
                "json" => (JSON_OUTPUT_FILE, serde_json::to_vec_pretty(records)?),
                "csv" => (CSV_OUTPUT_FILE, records_to_csv(records)?),
                other => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format. Valid formats: json, csv".to_string(),
                    })
                }
            };

            tracing::debug!("Writing {} ({} bytes) to storage", filename, data.len());
            self.storage.write_file(filename, &data).await?;
            written.push(format!(
                "{}/{}",
                self.output_path.trim_end_matches('/'),
                filename
            ));
        }

        Ok(written)
    }
}

/// 欄位依第一次出現的順序排列，巢狀值以 JSON 字串輸出
pub fn records_to_csv(records: &[OutputRecord]) -> Result<Vec<u8>> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.json.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["pairedItem"];
    header.extend(columns.iter().copied());
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![record.paired_item.item.to_string()];
        row.extend(columns.iter().map(|column| match record.json.get(*column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }));
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::parameters::StaticParameters;
    use crate::domain::model::{HttpRequest, ItemParameters};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct FixedTransport(Value);

    #[async_trait]
    impl Transport for FixedTransport {
        async fn request(&self, _request: &HttpRequest) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    fn record(value: Value, item: usize) -> OutputRecord {
        match value {
            Value::Object(json) => OutputRecord::new(json, item),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_run_writes_requested_formats() {
        tokio_test::block_on(async {
            let storage = MockStorage::new();
            let transport = FixedTransport(json!({"results": [{"fecha": "2024-01-01", "valor": 1}]}));
            let engine = EtlEngine::new(BatchProcessor::new(transport), storage.clone())
                .with_output("out/", vec!["json".to_string(), "csv".to_string()]);

            let report = engine
                .run(2, &StaticParameters(ItemParameters::default()))
                .await
                .unwrap();

            assert_eq!(report.records.len(), 2);
            assert_eq!(
                report.output_files,
                vec!["out/bcra_output.json", "out/bcra_output.csv"]
            );

            let json_file = storage.get_file(JSON_OUTPUT_FILE).await.unwrap();
            let written: Vec<OutputRecord> = serde_json::from_slice(&json_file).unwrap();
            assert_eq!(written, report.records);
            assert!(storage.get_file(CSV_OUTPUT_FILE).await.is_some());
        });
    }

    #[test]
    fn test_run_rejects_unknown_format() {
        tokio_test::block_on(async {
            let engine = EtlEngine::new(
                BatchProcessor::new(FixedTransport(json!({"results": []}))),
                MockStorage::new(),
            )
            .with_output("out", vec!["xlsx".to_string()]);

            let err = engine
                .run(1, &StaticParameters(ItemParameters::default()))
                .await
                .unwrap_err();

            assert!(matches!(err, EtlError::InvalidConfigValueError { .. }));
        });
    }

    #[test]
    fn test_csv_union_of_columns() {
        let records = vec![
            record(json!({"fecha": "2024-01-01", "valor": 100, "idVariable": 1}), 0),
            OutputRecord::error("boom", 1),
        ];

        let csv = String::from_utf8(records_to_csv(&records).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "pairedItem,fecha,valor,idVariable,error");
        assert_eq!(lines[1], "0,2024-01-01,100,1,");
        assert_eq!(lines[2], "1,,,,boom");
    }

    #[test]
    fn test_csv_nested_values_as_json() {
        let records = vec![record(json!({"metadata": {"count": 2}}), 0)];

        let csv = String::from_utf8(records_to_csv(&records).unwrap()).unwrap();
        assert!(csv.contains("\"{\"\"count\"\":2}\""));
    }

    #[test]
    fn test_csv_empty_records_only_header() {
        let csv = String::from_utf8(records_to_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.trim(), "pairedItem");
    }
}
