//! Batch processing: run every input through the pipeline and aggregate.

mod export;

pub use export::{CSV_HEADER, CsvExporter, suggested_filename, to_csv};

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FailureKind, FileError, FuelxError, Result};
use crate::invoice::{Normalizer, ProviderParser, detect, parser_for};
use crate::models::config::FuelxConfig;
use crate::models::record::{FuelRecord, InvoiceHeader, ProviderKind};
use crate::pdf::{RawDocument, extract_text};

/// One input document: a display name and its raw bytes.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Everything recovered from one successfully processed invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedInvoice {
    pub provider: ProviderKind,
    pub header: InvoiceHeader,
    pub records: Vec<FuelRecord>,
    /// Row-like lines that did not follow the layout and produced no record.
    pub rejected_rows: usize,
}

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    pub file_name: String,
    pub result: std::result::Result<ExtractedInvoice, FileError>,
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Records of a successful file; empty for a failure.
    pub fn records(&self) -> &[FuelRecord] {
        match &self.result {
            Ok(invoice) => &invoice.records,
            Err(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&FileError> {
        self.result.as_ref().err()
    }

    /// Rows skipped inside a successful file.
    pub fn rejected_rows(&self) -> usize {
        self.result.as_ref().map_or(0, |invoice| invoice.rejected_rows)
    }
}

/// Outcomes of a batch in input order, with aggregates fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    outcomes: Vec<ExtractionOutcome>,
    total_records: usize,
    total_amount: Decimal,
    rejected_rows: usize,
    processed_files: usize,
    failed_files: usize,
}

impl BatchResult {
    pub fn new(outcomes: Vec<ExtractionOutcome>) -> Self {
        let processed_files = outcomes.iter().filter(|o| o.is_success()).count();
        let failed_files = outcomes.len() - processed_files;
        let total_records = outcomes.iter().map(|o| o.records().len()).sum();
        // Row totals are capped by the normalizer; saturate rather than panic
        let total_amount = outcomes
            .iter()
            .flat_map(|o| o.records())
            .map(FuelRecord::total_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let rejected_rows = outcomes.iter().map(ExtractionOutcome::rejected_rows).sum();

        Self {
            outcomes,
            total_records,
            total_amount,
            rejected_rows,
            processed_files,
            failed_files,
        }
    }

    pub fn outcomes(&self) -> &[ExtractionOutcome] {
        &self.outcomes
    }

    /// All records, in input file order then row order.
    pub fn records(&self) -> impl Iterator<Item = &FuelRecord> {
        self.outcomes.iter().flat_map(|o| o.records())
    }

    /// Failed files with their errors, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FileError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|e| (o.file_name.as_str(), e)))
    }

    /// Successful files that skipped rows, with the number skipped.
    pub fn partial_files(&self) -> impl Iterator<Item = (&str, usize)> {
        self.outcomes
            .iter()
            .filter(|o| o.rejected_rows() > 0)
            .map(|o| (o.file_name.as_str(), o.rejected_rows()))
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn rejected_rows(&self) -> usize {
        self.rejected_rows
    }

    /// Sum of record totals, in EUR.
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Files processed successfully (including those with no rows).
    pub fn processed_files(&self) -> usize {
        self.processed_files
    }

    pub fn failed_files(&self) -> usize {
        self.failed_files
    }

    /// Export metadata for the batch.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total_records: self.total_records,
            total_amount: self.total_amount,
            rejected_rows: self.rejected_rows,
            processed_files: self.processed_files,
            failed_files: self.failed_files,
            partial_files: self
                .partial_files()
                .map(|(file, rejected_rows)| PartialReport {
                    file: file.to_string(),
                    rejected_rows,
                })
                .collect(),
            failures: self
                .failures()
                .map(|(file, error)| FailureReport {
                    file: file.to_string(),
                    kind: error.kind(),
                    message: error.to_string(),
                })
                .collect(),
        }
    }
}

/// Aggregates and failure details of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_records: usize,
    pub total_amount: Decimal,
    pub rejected_rows: usize,
    pub processed_files: usize,
    pub failed_files: usize,
    pub partial_files: Vec<PartialReport>,
    pub failures: Vec<FailureReport>,
}

/// A successful file that skipped malformed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialReport {
    pub file: String,
    pub rejected_rows: usize,
}

/// Why one file produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub file: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Extraction pipeline: text, detection, parsing and normalization.
pub struct Pipeline {
    config: FuelxConfig,
    normalizer: Normalizer,
}

impl Pipeline {
    pub fn new(config: FuelxConfig) -> Self {
        let normalizer = Normalizer::new(config.validation.clone());
        Self { config, normalizer }
    }

    /// Validate dates against a fixed day instead of today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.normalizer = self.normalizer.with_reference_date(date);
        self
    }

    pub fn config(&self) -> &FuelxConfig {
        &self.config
    }

    /// Process a single file. Failures are captured in the outcome.
    pub fn process_file(&self, file: &InputFile) -> ExtractionOutcome {
        let start = Instant::now();
        let result = self.extract(file);

        match &result {
            Ok(invoice) if invoice.rejected_rows > 0 => warn!(
                "{}: {} invoice, {} records, {} rows skipped in {}ms",
                file.name,
                invoice.provider,
                invoice.records.len(),
                invoice.rejected_rows,
                start.elapsed().as_millis()
            ),
            Ok(invoice) => info!(
                "{}: {} invoice, {} records in {}ms",
                file.name,
                invoice.provider,
                invoice.records.len(),
                start.elapsed().as_millis()
            ),
            Err(FileError::ExtractionFailed { provider, reason }) => {
                warn!("{}: {} layout not followed: {}", file.name, provider, reason)
            }
            Err(err) => warn!("{}: {}", file.name, err),
        }

        ExtractionOutcome {
            file_name: file.name.clone(),
            result,
        }
    }

    fn extract(&self, file: &InputFile) -> std::result::Result<ExtractedInvoice, FileError> {
        let document = extract_text(&file.bytes)?;

        let provider = detect(&document);
        let parser = parser_for(provider).ok_or(FileError::UnsupportedProvider)?;
        self.parse_guarded(parser, &document, &file.name)
    }

    /// Run parsing and normalization; a panic fails this file only.
    fn parse_guarded(
        &self,
        parser: &dyn ProviderParser,
        document: &RawDocument,
        file_name: &str,
    ) -> std::result::Result<ExtractedInvoice, FileError> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.parse_and_normalize(parser, document, file_name)
        }))
        .map_err(|_| FileError::extraction(parser.kind(), "parser aborted on unexpected input"))?
    }

    fn parse_and_normalize(
        &self,
        parser: &dyn ProviderParser,
        document: &RawDocument,
        file_name: &str,
    ) -> std::result::Result<ExtractedInvoice, FileError> {
        let provider = parser.kind();
        let parsed = parser.parse(document)?;
        if parsed.header.is_empty() {
            debug!("{}: no invoice header fields found", file_name);
        }

        // A single invalid row fails the whole file
        let records = parsed
            .rows
            .iter()
            .map(|row| self.normalizer.normalize(row, provider, file_name))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ExtractedInvoice {
            provider,
            header: parsed.header,
            records,
            rejected_rows: parsed.rejected_rows,
        })
    }

    /// Process every file and aggregate the outcomes in input order.
    ///
    /// Per-file failures never abort the batch. Only a crashed worker
    /// thread is reported as an error.
    pub fn process_batch(&self, files: &[InputFile]) -> Result<BatchResult> {
        let start = Instant::now();
        let jobs = self.config.batch.jobs.max(1).min(files.len().max(1));
        debug!(
            "Validating refueling dates up to {} days after {}",
            self.config.validation.max_future_days,
            self.normalizer.reference_date()
        );

        let outcomes = if jobs == 1 {
            files.iter().map(|f| self.process_file(f)).collect()
        } else {
            self.process_parallel(files, jobs)?
        };

        let result = BatchResult::new(outcomes);
        info!(
            "Batch of {} files: {} processed, {} failed, {} records, EUR {} in {}ms",
            files.len(),
            result.processed_files(),
            result.failed_files(),
            result.total_records(),
            result.total_amount(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    fn process_parallel(&self, files: &[InputFile], jobs: usize) -> Result<Vec<ExtractionOutcome>> {
        debug!("Processing {} files on {} workers", files.len(), jobs);
        let next = &AtomicUsize::new(0);
        let mut tagged: Vec<(usize, ExtractionOutcome)> = Vec::with_capacity(files.len());
        let mut crashed = 0;

        std::thread::scope(|scope| {
            let workers: Vec<_> = (0..jobs)
                .map(|_| {
                    scope.spawn(move || {
                        let mut done = Vec::new();
                        loop {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            let Some(file) = files.get(index) else {
                                break;
                            };
                            done.push((index, self.process_file(file)));
                        }
                        done
                    })
                })
                .collect();

            for worker in workers {
                match worker.join() {
                    Ok(done) => tagged.extend(done),
                    Err(_) => crashed += 1,
                }
            }
        });

        if crashed > 0 {
            return Err(FuelxError::Batch(format!(
                "{} of {} workers crashed",
                crashed, jobs
            )));
        }

        tagged.sort_by_key(|(index, _)| *index);
        Ok(tagged.into_iter().map(|(_, outcome)| outcome).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::invoice::ParsedInvoice;

    fn failure(name: &str, error: FileError) -> ExtractionOutcome {
        ExtractionOutcome {
            file_name: name.to_string(),
            result: Err(error),
        }
    }

    fn empty_success(name: &str) -> ExtractionOutcome {
        ExtractionOutcome {
            file_name: name.to_string(),
            result: Ok(ExtractedInvoice {
                provider: ProviderKind::Ip,
                header: InvoiceHeader::default(),
                records: Vec::new(),
                rejected_rows: 0,
            }),
        }
    }

    #[test]
    fn test_batch_aggregates() {
        let result = BatchResult::new(vec![
            empty_success("a.pdf"),
            failure("b.pdf", FileError::UnsupportedProvider),
            failure("c.pdf", FileError::from(PdfError::NoText)),
        ]);

        assert_eq!(result.processed_files(), 1);
        assert_eq!(result.failed_files(), 2);
        assert_eq!(result.total_records(), 0);
        assert_eq!(result.total_amount(), Decimal::ZERO);

        let summary = result.summary();
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].file, "b.pdf");
        assert_eq!(summary.failures[0].kind, FailureKind::UnsupportedProvider);
        assert_eq!(summary.failures[1].kind, FailureKind::UnreadablePdf);
    }

    #[test]
    fn test_summary_serializes() {
        let result = BatchResult::new(vec![failure("x.pdf", FileError::UnsupportedProvider)]);
        let json = serde_json::to_value(result.summary()).unwrap();
        assert_eq!(json["failed_files"], 1);
        assert_eq!(json["failures"][0]["kind"], "UnsupportedProvider");
    }

    #[test]
    fn test_garbage_files_fail_individually() {
        let pipeline = Pipeline::new(FuelxConfig::default());
        let files = vec![
            InputFile::new("one.pdf", b"not a pdf".to_vec()),
            InputFile::new("two.pdf", Vec::new()),
        ];
        let result = pipeline.process_batch(&files).unwrap();
        assert_eq!(result.failed_files(), 2);
        assert_eq!(result.outcomes()[0].file_name, "one.pdf");
        assert_eq!(result.outcomes()[1].file_name, "two.pdf");
        assert!(matches!(
            result.outcomes()[0].error(),
            Some(FileError::UnreadablePdf(_))
        ));
    }

    struct Exploding;

    impl ProviderParser for Exploding {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Q8
        }

        fn parse(&self, _document: &RawDocument) -> std::result::Result<ParsedInvoice, FileError> {
            panic!("unexpected layout");
        }
    }

    #[test]
    fn test_parser_panic_fails_only_that_file() {
        let pipeline = Pipeline::new(FuelxConfig::default());
        let document = RawDocument::from_text("Kuwait Petroleum Italia");
        let err = pipeline
            .parse_guarded(&Exploding, &document, "q8.pdf")
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::ExtractionFailed);
        assert!(matches!(
            err,
            FileError::ExtractionFailed { provider: ProviderKind::Q8, .. }
        ));
    }

    #[test]
    fn test_rejected_rows_reach_summary() {
        let mut partial = empty_success("a.pdf");
        if let Ok(invoice) = &mut partial.result {
            invoice.rejected_rows = 2;
        }
        let result = BatchResult::new(vec![
            partial,
            empty_success("b.pdf"),
            failure("c.pdf", FileError::UnsupportedProvider),
        ]);

        assert_eq!(result.rejected_rows(), 2);
        let partial_files: Vec<_> = result.partial_files().collect();
        assert_eq!(partial_files, vec![("a.pdf", 2)]);

        let summary = result.summary();
        assert_eq!(summary.rejected_rows, 2);
        assert_eq!(
            summary.partial_files,
            vec![PartialReport {
                file: "a.pdf".to_string(),
                rejected_rows: 2
            }]
        );
    }

    #[test]
    fn test_empty_batch() {
        let pipeline = Pipeline::new(FuelxConfig::default());
        let result = pipeline.process_batch(&[]).unwrap();
        assert_eq!(result.outcomes().len(), 0);
        assert_eq!(result.summary().failures.len(), 0);
    }
}
