use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{FlowTagError, Result};
use crate::lookup::LookupTable;
use crate::record::{FlowLogRecord, TaggedRecord};

pub fn default_worker_count() -> usize {
    std::cmp::min(num_cpus::get(), 8)
}

/// Attaches the lookup table's tags to a record, or `Untagged` when its key is absent.
pub fn tag_record(record: FlowLogRecord, table: &LookupTable) -> TaggedRecord {
    match table.get(&record.dst_port, &record.protocol) {
        Some(tags) => TaggedRecord {
            tags: tags.to_vec(),
            record,
        },
        None => TaggedRecord::untagged(record),
    }
}

/// Tags records against a shared lookup table, sequentially or on a worker pool.
/// Output order always matches input order.
pub struct Tagger<'a> {
    table: &'a LookupTable,
    pool: Option<ThreadPool>,
}

impl<'a> Tagger<'a> {
    pub fn sequential(table: &'a LookupTable) -> Self {
        Self { table, pool: None }
    }

    /// One worker runs inline; more build a dedicated rayon pool.
    pub fn with_workers(table: &'a LookupTable, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(FlowTagError::InvalidConfig(
                "worker count must be greater than 0".to_string(),
            ));
        }
        if workers == 1 {
            return Ok(Self::sequential(table));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("flowtag-tagger-{i}"))
            .build()
            .map_err(|e| FlowTagError::InvalidConfig(format!("failed to start tagging workers: {e}")))?;
        Ok(Self {
            table,
            pool: Some(pool),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.pool
            .as_ref()
            .map(ThreadPool::current_num_threads)
            .unwrap_or(1)
    }

    pub fn tag(&self, records: Vec<FlowLogRecord>) -> Vec<TaggedRecord> {
        let table = self.table;
        match &self.pool {
            Some(pool) => pool.install(|| {
                records
                    .into_par_iter()
                    .map(|record| tag_record(record, table))
                    .collect()
            }),
            None => records
                .into_iter()
                .map(|record| tag_record(record, table))
                .collect(),
        }
    }
}
