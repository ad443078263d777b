pub mod aggregate;
pub mod args;
pub mod config;
pub mod error;
pub mod lookup;
pub mod observer;
pub mod pipeline;
pub mod protocol;
pub mod reader;
pub mod record;
pub mod report;
pub mod tagger;
pub mod utils;

pub use aggregate::{aggregate, count_port_protocols, count_tags, Aggregates, PortProtocolCount, TagCount};
pub use args::Args;
pub use config::PipelineConfig;
pub use error::{FlowTagError, Result};
pub use lookup::{LookupKey, LookupTable};
pub use observer::{RecordingObserver, RunEvent, RunObserver, TracingObserver};
pub use pipeline::{print_summary, process_logs, run_pipeline, PipelineSummary, ProcessedLogs};
pub use protocol::normalize_protocol;
pub use reader::{ChunkedLogReader, DEFAULT_CHUNK_SIZE};
pub use record::{FlowLogRecord, TaggedRecord, UNTAGGED};
pub use tagger::Tagger;
