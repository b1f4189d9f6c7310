use crate::adapters::FileFetcher;
use crate::domain::model::{KeyedRecord, Record, RecordKey};
use crate::domain::ports::{DataSource, Fetcher, ParsedStream, ParserHandle, RecordStream};
use crate::utils::error::Result;
use tracing::debug;

/// A data source made of one fetcher and one parser.
///
/// Records are keyed by position unless a `key_field` is set, in which case a record whose
/// `key_field` holds a string is keyed by that string instead.
pub struct FileDataSource<F: Fetcher = FileFetcher> {
    fetcher: F,
    parser: ParserHandle,
    key_field: Option<String>,
}

impl<F: Fetcher> FileDataSource<F> {
    pub fn new(fetcher: F, parser: ParserHandle) -> Self {
        Self {
            fetcher,
            parser,
            key_field: None,
        }
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = Some(key_field.into());
        self
    }

    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    pub fn parser_name(&self) -> &'static str {
        self.parser.name()
    }

    fn fetch(&self) -> Result<String> {
        debug!(
            "Fetching {} with {} parser",
            self.fetcher.location(),
            self.parser.name()
        );
        self.fetcher.fetch()
    }
}

impl<F: Fetcher> std::fmt::Debug for FileDataSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDataSource")
            .field("location", &self.fetcher.location())
            .field("parser", &self.parser)
            .field("key_field", &self.key_field)
            .finish()
    }
}

fn key_for(key_field: Option<&str>, position: usize, record: &Record) -> RecordKey {
    key_field
        .and_then(|field| record.get_str(field))
        .map(|id| RecordKey::Id(id.to_string()))
        .unwrap_or(RecordKey::Index(position))
}

impl<F: Fetcher> DataSource for FileDataSource<F> {
    fn get_all(&self) -> Result<Vec<Record>> {
        let raw = self.fetch()?;
        self.parser.parse(&raw)
    }

    fn get_one(&self, key: &RecordKey) -> Result<Option<Record>> {
        let key_field = self.key_field();
        let found = self
            .get_all()?
            .into_iter()
            .enumerate()
            .find(|(position, record)| key_for(key_field, *position, record) == *key)
            .map(|(_, record)| record);

        if found.is_none() {
            debug!("No record under key {}", key);
        }
        Ok(found)
    }

    fn stream(&self) -> Result<RecordStream> {
        let raw = self.fetch()?;
        let key_field = self.key_field.clone();

        let positioned: ParsedStream = match self.parser.as_streaming() {
            Some(parser) => parser.parse_stream(raw),
            None => {
                debug!(
                    "{} parser cannot stream, materializing records first",
                    self.parser.name()
                );
                let records = self.parser.parse(&raw)?;
                Box::new(records.into_iter().enumerate().map(Ok))
            }
        };

        let keyed: RecordStream = Box::new(positioned.map(move |item| {
            item.map(|(position, record)| {
                let key = key_for(key_field.as_deref(), position, &record);
                KeyedRecord::new(key, record)
            })
        }));
        Ok(keyed)
    }

    fn supports_streaming(&self) -> bool {
        self.parser.supports_streaming()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{JsonLinesParser, JsonParser};
    use crate::domain::ports::Parser;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MemoryFetcher {
        content: String,
        fetches: Arc<AtomicUsize>,
    }

    impl MemoryFetcher {
        fn new(content: &str) -> Self {
            Self {
                content: content.to_string(),
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Fetcher for MemoryFetcher {
        fn fetch(&self) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.content.clone())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    /// Batch-only wrapper used to check the non-streaming fallback.
    struct BatchOnly<P: Parser>(P);

    impl<P: Parser> Parser for BatchOnly<P> {
        fn name(&self) -> &'static str {
            "batch-only"
        }

        fn parse(&self, raw: &str) -> Result<Vec<Record>> {
            self.0.parse(raw)
        }
    }

    const JSONL: &str = "{\"order_number\":\"#1001\"}\n\n{\"order_number\":\"#1002\"}\n{\"title\":\"no number\"}\n";

    fn collect(stream: RecordStream) -> Vec<KeyedRecord> {
        stream.collect::<Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_get_all_refetches_every_call() {
        let fetcher = MemoryFetcher::new(JSONL);
        let fetches = fetcher.fetches.clone();
        let source = FileDataSource::new(fetcher, ParserHandle::streaming(JsonLinesParser));

        assert_eq!(source.get_all().unwrap().len(), 3);
        assert_eq!(source.get_all().unwrap().len(), 3);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_get_one_by_index() {
        let source = FileDataSource::new(
            MemoryFetcher::new(JSONL),
            ParserHandle::streaming(JsonLinesParser),
        );

        let record = source.get_one(&RecordKey::Index(1)).unwrap().unwrap();
        assert_eq!(record.get_str("order_number"), Some("#1002"));
        assert!(source.get_one(&RecordKey::Index(7)).unwrap().is_none());
        assert!(source.get_one(&RecordKey::from("#1002")).unwrap().is_none());
    }

    #[test]
    fn test_get_one_by_declared_id() {
        let source = FileDataSource::new(
            MemoryFetcher::new(JSONL),
            ParserHandle::streaming(JsonLinesParser),
        )
        .with_key_field("order_number");

        let record = source.get_one(&RecordKey::from("#1002")).unwrap().unwrap();
        assert_eq!(record.get_str("order_number"), Some("#1002"));
        assert!(source.get_one(&RecordKey::from("#9999")).unwrap().is_none());

        // Records without the field keep their position.
        let record = source.get_one(&RecordKey::Index(2)).unwrap().unwrap();
        assert_eq!(record.get_str("title"), Some("no number"));
    }

    #[test]
    fn test_stream_keys() {
        let source = FileDataSource::new(
            MemoryFetcher::new(JSONL),
            ParserHandle::streaming(JsonLinesParser),
        )
        .with_key_field("order_number");

        let keys: Vec<RecordKey> = collect(source.stream().unwrap())
            .into_iter()
            .map(|keyed| keyed.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                RecordKey::from("#1001"),
                RecordKey::from("#1002"),
                RecordKey::Index(2)
            ]
        );
    }

    #[test]
    fn test_stream_fallback_is_equivalent() {
        let streaming = FileDataSource::new(
            MemoryFetcher::new(JSONL),
            ParserHandle::streaming(JsonLinesParser),
        );
        let batch = FileDataSource::new(
            MemoryFetcher::new(JSONL),
            ParserHandle::basic(BatchOnly(JsonLinesParser)),
        );

        assert!(streaming.supports_streaming());
        assert!(!batch.supports_streaming());
        assert_eq!(batch.parser_name(), "batch-only");
        assert_eq!(
            collect(streaming.stream().unwrap()),
            collect(batch.stream().unwrap())
        );
    }

    #[test]
    fn test_each_stream_replays_the_source() {
        let fetcher = MemoryFetcher::new(r##"[{"order_number":"#1"},{"order_number":"#2"}]"##);
        let fetches = fetcher.fetches.clone();
        let source = FileDataSource::new(fetcher, ParserHandle::streaming(JsonParser));

        let mut first = source.stream().unwrap();
        let second = source.stream().unwrap();
        assert!(first.next().unwrap().is_ok());
        drop(first);

        assert_eq!(collect(second).len(), 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_batch_fallback_surfaces_parse_errors_eagerly() {
        let source = FileDataSource::new(
            MemoryFetcher::new("{\"a\":1}\nbroken"),
            ParserHandle::basic(BatchOnly(JsonLinesParser)),
        );
        assert!(source.stream().is_err());
        assert!(source.get_all().is_err());
    }
}
