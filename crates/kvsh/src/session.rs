//! Session state and command handlers

use kvcache::{CacheStats, LruCache};
use kvtable::{
    ArraySet, ChainingTable, KeyValueTable, OpenAddressingTable, Slot, TableConfig, TableStats,
};
use serde::Serialize;
use tracing::warn;

use crate::command::{Command, USAGE};
use crate::reply::Reply;

/// Parameters for a new session
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Shared by both hash tables
    pub table: TableConfig,
    /// LRU cache capacity
    pub cache_capacity: usize,
    /// Initial string-set capacity
    pub set_capacity: usize,
}

/// Every structure the shell drives, plus the GET results collected so far
pub struct Session {
    open: OpenAddressingTable,
    chained: ChainingTable,
    cache: LruCache,
    set: ArraySet,
    get_results: Vec<i64>,
}

#[derive(Serialize)]
struct StatsReport<'a> {
    open_addressing: TableStats,
    chaining: TableStats,
    cache: CacheReport<'a>,
    set: SetReport,
}

#[derive(Serialize)]
struct CacheReport<'a> {
    len: usize,
    capacity: usize,
    hit_ratio: f64,
    counters: &'a CacheStats,
}

#[derive(Serialize)]
struct SetReport {
    len: usize,
    capacity: usize,
}

impl Session {
    /// Build all structures from `config`
    pub fn new(config: &SessionConfig) -> kvtable::Result<Self> {
        Ok(Self {
            open: OpenAddressingTable::with_config(config.table)?,
            chained: ChainingTable::with_config(config.table)?,
            cache: LruCache::new(config.cache_capacity)?,
            set: ArraySet::with_capacity(config.set_capacity)?,
            get_results: Vec::new(),
        })
    }

    /// Execute one command
    pub fn handle(&mut self, cmd: Command) -> Reply {
        match cmd {
            Command::Insert { key, value } => self.handle_insert(key, value),
            Command::Search { key } => self.handle_search(key),
            Command::Remove { key } => self.handle_remove(key),
            Command::Set { key, value } => self.handle_set(key, value),
            Command::Get { key } => self.handle_get(key),
            Command::SetAdd(member) => self.handle_sadd(&member),
            Command::SetRemove(member) => self.handle_srem(&member),
            Command::SetContains(member) => self.handle_sismember(&member),
            Command::Dump => self.handle_dump(),
            Command::Stats => self.handle_stats(),
            Command::Help => handle_help(),
            Command::Quit => Reply::Quit,
        }
    }

    /// Values returned by every GET so far, misses included
    pub fn get_results(&self) -> &[i64] {
        &self.get_results
    }

    fn tables(&mut self) -> [(&'static str, &'static str, &mut dyn KeyValueTable); 2] {
        [
            ("open addressing", "slot", &mut self.open as &mut dyn KeyValueTable),
            ("chaining", "bucket", &mut self.chained as &mut dyn KeyValueTable),
        ]
    }

    fn handle_insert(&mut self, key: i64, value: String) -> Reply {
        Reply::Lines(insert_all(self.tables(), key, &value))
    }

    fn handle_search(&mut self, key: i64) -> Reply {
        let lines = self
            .tables()
            .into_iter()
            .map(|(name, _, table)| match table.search(key) {
                Some(value) => format!("{}: key {} -> '{}'", name, key, value),
                None => format!("{}: key {} -> Not Found", name, key),
            })
            .collect();
        Reply::Lines(lines)
    }

    fn handle_remove(&mut self, key: i64) -> Reply {
        let lines = self
            .tables()
            .into_iter()
            .map(|(name, place, table)| {
                let idx = table.locate(key);
                match (table.remove(key), idx) {
                    (Some(_), Some(idx)) => {
                        format!("{}: key {} removed from {} {}", name, key, place, idx)
                    }
                    _ => format!("{}: key {} not found", name, key),
                }
            })
            .collect();
        Reply::Lines(lines)
    }

    fn handle_set(&mut self, key: i64, value: i64) -> Reply {
        match self.cache.set(key, value) {
            Ok(evicted) => {
                let mut lines = vec![format!("set key={} value={}", key, value)];
                if let Some((old_key, old_value)) = evicted {
                    lines.push(format!("evicted key={} value={}", old_key, old_value));
                }
                lines.push(self.cache_line());
                Reply::Lines(lines)
            }
            Err(e) => {
                warn!(key, error = %e, "cache set failed");
                Reply::Error(e.to_string())
            }
        }
    }

    fn handle_get(&mut self, key: i64) -> Reply {
        let value = self.cache.get_or_miss(key);
        self.get_results.push(value);
        Reply::Lines(vec![
            format!("get key={} value={}", key, value),
            self.cache_line(),
        ])
    }

    fn handle_sadd(&mut self, member: &str) -> Reply {
        match self.set.insert(member) {
            Ok(true) => Reply::line(format!("added '{}'", member)),
            Ok(false) => Reply::line(format!("'{}' already present", member)),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    fn handle_srem(&mut self, member: &str) -> Reply {
        if self.set.remove(member) {
            Reply::line(format!("removed '{}'", member))
        } else {
            Reply::line(format!("'{}' is not a member", member))
        }
    }

    fn handle_sismember(&self, member: &str) -> Reply {
        Reply::line(self.set.contains(member).to_string())
    }

    fn handle_dump(&self) -> Reply {
        let mut lines = vec!["open addressing:".to_string()];
        let mut any = false;
        for (idx, slot) in self.open.slots() {
            if let Slot::Occupied { key, value } = slot {
                lines.push(format!("  slot {}: key={}, value='{}'", idx, key, value));
                any = true;
            }
        }
        if !any {
            lines.push("  (empty)".to_string());
        }

        lines.push("chaining:".to_string());
        let mut any = false;
        for (idx, bucket) in self.chained.buckets() {
            if bucket.is_empty() {
                continue;
            }
            let entries: Vec<String> = bucket
                .iter()
                .map(|(key, value)| format!("[{}:'{}']", key, value))
                .collect();
            lines.push(format!(
                "  bucket {}: {} ({} entries)",
                idx,
                entries.join(" "),
                bucket.len()
            ));
            any = true;
        }
        if !any {
            lines.push("  (empty)".to_string());
        }

        lines.push(self.cache_line());

        let members: Vec<&str> = self.set.iter().collect();
        lines.push(format!(
            "set ({}/{}): {{{}}}",
            self.set.len(),
            self.set.capacity(),
            members.join(", ")
        ));

        Reply::Lines(lines)
    }

    fn handle_stats(&self) -> Reply {
        let report = StatsReport {
            open_addressing: self.open.stats(),
            chaining: self.chained.stats(),
            cache: CacheReport {
                len: self.cache.len(),
                capacity: self.cache.capacity(),
                hit_ratio: self.cache.stats().hit_ratio(),
                counters: self.cache.stats(),
            },
            set: SetReport {
                len: self.set.len(),
                capacity: self.set.capacity(),
            },
        };

        match serde_json::to_string_pretty(&report) {
            Ok(json) => Reply::Lines(json.lines().map(str::to_string).collect()),
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    /// Cache contents, most recently used first
    fn cache_line(&self) -> String {
        let entries: Vec<String> = self
            .cache
            .iter()
            .map(|(key, value)| format!("{}:{}", key, value))
            .collect();
        format!(
            "cache ({}/{}): {}",
            self.cache.len(),
            self.cache.capacity(),
            entries.join(" -> ")
        )
    }
}

/// Insert into every table, one outcome per table even when one fails
fn insert_all<'a>(
    tables: impl IntoIterator<Item = (&'static str, &'static str, &'a mut dyn KeyValueTable)>,
    key: i64,
    value: &str,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, place, table) in tables {
        let rehashes = table.stats().rehash_count;
        match table.insert(key, value.to_string()) {
            Ok(previous) => {
                let stats = table.stats();
                if stats.rehash_count > rehashes {
                    lines.push(format!(
                        "{}: rehashed to capacity {} (load factor {:.2})",
                        name, stats.capacity, stats.load_factor
                    ));
                }
                let verb = if previous.is_some() { "updated" } else { "inserted" };
                let at = table
                    .locate(key)
                    .map(|idx| format!(" in {} {}", place, idx))
                    .unwrap_or_default();
                lines.push(format!("{}: key {} {}{}", name, key, verb, at));
            }
            Err(e) => {
                warn!(key, table = name, error = %e, "insert failed");
                lines.push(format!("{}: ERR {}", name, e));
            }
        }
    }
    lines
}

fn handle_help() -> Reply {
    Reply::Lines(USAGE.iter().map(|(_, usage)| format!("  {}", usage)).collect())
}
