//! Main processor orchestration
//!
//! Header parsing and cleanup run in parallel over a batch of messages;
//! the results are ingested into the address book strictly in input order.

use crate::book::{AddressBook, Observation};
use crate::config::Config;
use crate::error::{MailbookError, Result};
use crate::filter::{NoiseConfig, RestrictedList, SkipList};
use crate::mbox::MessageSplitter;
use crate::normalize::{MessageOutcome, Normalizer};
use crate::output;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Messages parsed per parallel batch
const BATCH_SIZE: usize = 1000;

/// Counters for one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Input files read (stdin counts as one)
    pub inputs: usize,
    /// Messages split out of the input
    pub messages: u64,
    /// Messages whose headers could not be parsed
    pub unparsable: u64,
    /// Observations ingested
    pub observations: u64,
    /// Addresses dropped by filters
    pub skipped: u64,
}

impl RunStats {
    fn record(&mut self, outcome: &MessageOutcome) {
        self.messages += 1;
        self.skipped += outcome.skipped as u64;
        self.observations += outcome.observations.len() as u64;
        if outcome.unparsable {
            self.unparsable += 1;
        }
    }
}

/// Reads mbox input, builds the address book and writes it out
pub struct Processor {
    config: Config,
    normalizer: Normalizer,
    pool: ThreadPool,
    progress: ProgressBar,
    book: AddressBook,
    stats: RunStats,
}

impl Processor {
    /// Create a new processor with the given configuration
    ///
    /// # Errors
    /// Returns an error if the skip or restricted list cannot be loaded, or
    /// the worker pool cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let noise = NoiseConfig::load_or_default(config.noise_config_path.as_deref());
        let skip = match &config.skip_regexps_path {
            Some(path) => SkipList::load(path)?,
            None => SkipList::default(),
        };
        let restricted = match &config.restricted_path {
            Some(path) => RestrictedList::load(path)?,
            None => RestrictedList::default(),
        };

        if config.operator_patterns.is_empty() {
            warn!("No --me pattern given; every address will be counted as seen, none as sent");
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .build()
            .map_err(|e| MailbookError::Config(format!("Failed to build worker pool: {e}")))?;

        info!(
            "Processor initialized. Workers: {}, skip expressions: {}, restricted addresses: {}",
            pool.current_num_threads(),
            skip.len(),
            restricted.len()
        );

        let progress = if config.show_progress {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {pos} messages {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        } else {
            ProgressBar::hidden()
        };

        let normalizer = Normalizer::new(
            noise,
            skip,
            restricted,
            config.operator_patterns.clone(),
        );

        Ok(Self {
            config,
            normalizer,
            pool,
            progress,
            book: AddressBook::new(),
            stats: RunStats::default(),
        })
    }

    /// Read all configured input and write the finished book
    ///
    /// # Errors
    /// Returns an error on unreadable input, an inconsistent address
    /// history, or a failed write.
    pub fn process(&mut self) -> Result<()> {
        if self.config.reads_stdin() {
            info!("Reading mbox data from stdin");
            let stdin = io::stdin();
            self.ingest_reader(stdin.lock())?;
        } else {
            let files = self.collect_input_files()?;
            if files.is_empty() {
                warn!("No input files found");
            }
            for path in files {
                self.progress.set_message(path.display().to_string());
                debug!("Reading {}", path.display());
                let file = File::open(&path)?;
                self.ingest_reader(BufReader::with_capacity(64 * 1024, file))?;
            }
        }

        self.progress.finish_with_message("done");

        let mut sink = output::open_sink(&self.config.output_path)?;
        output::write_book(&self.book, self.config.format, &mut sink)?;

        info!(
            "Read {} messages from {} input(s): {} addresses kept as {} variants, {} skipped, {} unparsable messages",
            self.stats.messages,
            self.stats.inputs,
            self.book.len(),
            self.book.variant_count(),
            self.stats.skipped,
            self.stats.unparsable
        );

        Ok(())
    }

    /// Ingest every message from one mbox stream
    ///
    /// # Errors
    /// Returns an error if reading fails or the book rejects an observation.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        self.stats.inputs += 1;
        let mut batch: Vec<Vec<u8>> = Vec::with_capacity(BATCH_SIZE);

        for message in MessageSplitter::new(reader) {
            batch.push(message?);
            if batch.len() == BATCH_SIZE {
                self.ingest_batch(&batch)?;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            self.ingest_batch(&batch)?;
        }
        Ok(())
    }

    /// Parse a batch in parallel, then ingest it in order
    fn ingest_batch(&mut self, batch: &[Vec<u8>]) -> Result<()> {
        let normalizer = &self.normalizer;
        let outcomes: Vec<MessageOutcome> = self
            .pool
            .install(|| batch.par_iter().map(|raw| normalizer.observe(raw)).collect());

        for outcome in &outcomes {
            self.stats.record(outcome);
            for observation in &outcome.observations {
                self.ingest_observation(observation)?;
            }
        }
        self.progress.inc(batch.len() as u64);
        Ok(())
    }

    fn ingest_observation(&mut self, observation: &Observation) -> Result<()> {
        self.book.ingest_observation(observation)
    }

    /// Expand the configured inputs: files as given, directories to their
    /// regular files sorted by path
    fn collect_input_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for input in &self.config.input_paths {
            if input.is_file() {
                files.push(input.clone());
            } else if input.is_dir() {
                files.extend(Self::directory_files(input)?);
            } else {
                return Err(MailbookError::Path(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
        }
        Ok(files)
    }

    fn directory_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'));
            if path.is_file() && !hidden {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// The book built so far
    #[must_use]
    pub const fn book(&self) -> &AddressBook {
        &self.book
    }

    /// Counters for the run so far
    #[must_use]
    pub const fn stats(&self) -> RunStats {
        self.stats
    }

    /// Take the finished book
    #[must_use]
    pub fn into_book(self) -> AddressBook {
        self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::tempdir;

    const JIM_MBOX: &str = "From jim@x.com Mon Nov  7 10:00:00 2011\n\
From: Jim Smith <jim@x.com>\n\
Subject: hello\n\
Date: Mon, 07 Nov 2011 10:00:00 +0000\n\
\n\
hi\n\
From ann@y.org Tue Jul  7 09:00:00 2015\n\
From: Ann <ann@y.org>\n\
To: JIM SMITH <JIM@X.COM>\n\
Date: Tue, 07 Jul 2015 09:00:00 +0000\n\
\n\
hello back\n";

    fn test_config(dir: &Path) -> Config {
        Config {
            output_path: dir.join("book.el"),
            operator_patterns: vec!["jim@x.com".to_string()],
            show_progress: false,
            max_workers: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_processor_creation() {
        let dir = tempdir().unwrap();
        let processor = Processor::new(test_config(dir.path()));
        assert!(processor.is_ok());
    }

    #[test]
    fn test_missing_skip_list_fails() {
        let dir = tempdir().unwrap();
        let config = Config {
            skip_regexps_path: Some(dir.path().join("missing.txt")),
            ..test_config(dir.path())
        };
        assert!(Processor::new(config).is_err());
    }

    #[test]
    fn test_own_mail_and_reply_merge() {
        let dir = tempdir().unwrap();
        let mut processor = Processor::new(test_config(dir.path())).unwrap();
        processor.ingest_reader(JIM_MBOX.as_bytes()).unwrap();

        let stats = processor.stats();
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.observations, 3);

        let book = processor.into_book();
        assert_eq!(book.len(), 2);

        let jim = book.get("jim@x.com").unwrap();
        let observed: Vec<_> = jim.observed_variants().collect();
        assert_eq!(observed.len(), 1);
        let (display, variant) = observed[0];
        assert_eq!(display, "JIM SMITH <jim@x.com>");
        assert_eq!(variant.last_seen.as_deref(), Some("2015 Jul 07"));
        assert_eq!((variant.sent_count, variant.seen_count), (1, 1));

        let ann = book.get("ann@y.org").unwrap();
        let ann_variant = ann.variant("Ann <ann@y.org>").unwrap();
        assert_eq!((ann_variant.sent_count, ann_variant.seen_count), (0, 1));
    }

    #[test]
    fn test_order_preserved_across_batches() {
        let dir = tempdir().unwrap();
        let mut mbox = String::new();
        for i in 0..(BATCH_SIZE + 10) {
            let name = if i % 2 == 0 { "bob lee" } else { "Bob Lee" };
            mbox.push_str(&format!(
                "From x\nFrom: {name} <bob@lee.org>\nDate: Thu, 01 Jan 2015 00:00:00 +0000\n\nbody {i}\n"
            ));
        }

        let mut processor = Processor::new(test_config(dir.path())).unwrap();
        processor.ingest_reader(mbox.as_bytes()).unwrap();

        let book = processor.into_book();
        let bob = book.get("bob@lee.org").unwrap();
        let observed: Vec<_> = bob.observed_variants().collect();
        assert_eq!(observed.len(), 1);
        assert_eq!(observed[0].0, "Bob Lee <bob@lee.org>");
        assert_eq!(observed[0].1.seen_count as usize, BATCH_SIZE + 10);
    }

    #[test]
    fn test_process_files_and_write_output() {
        let dir = tempdir().unwrap();
        let inbox = dir.path().join("mail");
        std::fs::create_dir(&inbox).unwrap();
        std::fs::write(inbox.join("a.mbox"), JIM_MBOX).unwrap();
        std::fs::write(inbox.join(".hidden"), "From x\nFrom: z@z.org\n\n").unwrap();

        let config = Config {
            input_paths: vec![inbox],
            format: OutputFormat::Csv,
            output_path: dir.path().join("out").join("book.csv"),
            ..test_config(dir.path())
        };
        let mut processor = Processor::new(config).unwrap();
        processor.process().unwrap();
        assert_eq!(processor.stats().inputs, 1);
        assert!(processor.book().get("z@z.org").is_none());

        let csv = std::fs::read_to_string(dir.path().join("out").join("book.csv")).unwrap();
        assert!(csv.starts_with("Address,Variant,LastSeen,SentCount,SeenCount\n"));
        assert!(csv.contains("jim@x.com,JIM SMITH <jim@x.com>,2015 Jul 07,1,1"));
        assert!(csv.contains("ann@y.org,Ann <ann@y.org>,2015 Jul 07,0,1"));
    }

    #[test]
    fn test_missing_input_path() {
        let dir = tempdir().unwrap();
        let config = Config {
            input_paths: vec![dir.path().join("nope.mbox")],
            ..test_config(dir.path())
        };
        let mut processor = Processor::new(config).unwrap();
        let err = processor.process().unwrap_err();
        assert!(matches!(err, MailbookError::Path(_)));
    }

    #[test]
    fn test_direction_without_operator() {
        let dir = tempdir().unwrap();
        let config = Config {
            operator_patterns: Vec::new(),
            ..test_config(dir.path())
        };
        let mut processor = Processor::new(config).unwrap();
        processor.ingest_reader(JIM_MBOX.as_bytes()).unwrap();
        let book = processor.into_book();
        assert!(book
            .iter()
            .flat_map(|(_, h)| h.variants())
            .all(|(_, v)| v.sent_count == 0));
    }
}
