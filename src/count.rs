//! Resource Tallies
//!
//! Accumulators for the report. A [`Tally`] holds one counter per billable
//! resource type; the same type serves both scopes, per-project and global.
//! Tallies are plain values: the orchestrator resets the per-project tally
//! between projects and folds it into the global tally after each project.

/// Counts for the ten billable resource types, in report order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub compute_instances: u64,
    pub sql_instances: u64,
    pub storage_buckets: u64,
    pub filestore_instances: u64,
    pub bigquery_datasets: u64,
    pub bigtable_instances: u64,
    pub spanner_instances: u64,
    pub redis_instances: u64,
    pub memcache_instances: u64,
    pub firestore_databases: u64,
}

impl Tally {
    /// Add a count to the accumulator named by a registry key
    ///
    /// Returns false when the key names no accumulator, leaving the tally
    /// untouched.
    pub fn record(&mut self, key: &str, count: u64) -> bool {
        let Some(slot) = self.slot(key) else {
            return false;
        };
        *slot += count;
        true
    }

    /// Read the accumulator named by a registry key
    pub fn get(&self, key: &str) -> Option<u64> {
        match key {
            "compute-instances" => Some(self.compute_instances),
            "sql-instances" => Some(self.sql_instances),
            "storage-buckets" => Some(self.storage_buckets),
            "filestore-instances" => Some(self.filestore_instances),
            "bigquery-datasets" => Some(self.bigquery_datasets),
            "bigtable-instances" => Some(self.bigtable_instances),
            "spanner-instances" => Some(self.spanner_instances),
            "redis-instances" => Some(self.redis_instances),
            "memcache-instances" => Some(self.memcache_instances),
            "firestore-databases" => Some(self.firestore_databases),
            _ => None,
        }
    }

    /// Sum of all ten accumulators
    pub fn total(&self) -> u64 {
        self.compute_instances
            + self.sql_instances
            + self.storage_buckets
            + self.filestore_instances
            + self.bigquery_datasets
            + self.bigtable_instances
            + self.spanner_instances
            + self.redis_instances
            + self.memcache_instances
            + self.firestore_databases
    }

    /// Zero every accumulator
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold another tally into this one, field by field
    pub fn absorb(&mut self, other: &Tally) {
        self.compute_instances += other.compute_instances;
        self.sql_instances += other.sql_instances;
        self.storage_buckets += other.storage_buckets;
        self.filestore_instances += other.filestore_instances;
        self.bigquery_datasets += other.bigquery_datasets;
        self.bigtable_instances += other.bigtable_instances;
        self.spanner_instances += other.spanner_instances;
        self.redis_instances += other.redis_instances;
        self.memcache_instances += other.memcache_instances;
        self.firestore_databases += other.firestore_databases;
    }

    fn slot(&mut self, key: &str) -> Option<&mut u64> {
        match key {
            "compute-instances" => Some(&mut self.compute_instances),
            "sql-instances" => Some(&mut self.sql_instances),
            "storage-buckets" => Some(&mut self.storage_buckets),
            "filestore-instances" => Some(&mut self.filestore_instances),
            "bigquery-datasets" => Some(&mut self.bigquery_datasets),
            "bigtable-instances" => Some(&mut self.bigtable_instances),
            "spanner-instances" => Some(&mut self.spanner_instances),
            "redis-instances" => Some(&mut self.redis_instances),
            "memcache-instances" => Some(&mut self.memcache_instances),
            "firestore-databases" => Some(&mut self.firestore_databases),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::billable_resources;

    #[test]
    fn test_new_tally_is_zero() {
        let tally = Tally::default();
        assert_eq!(tally.total(), 0);
        for def in billable_resources() {
            assert_eq!(tally.get(&def.key), Some(0));
        }
    }

    #[test]
    fn test_every_registry_key_has_a_slot() {
        let mut tally = Tally::default();
        for def in billable_resources() {
            assert!(tally.record(&def.key, 1), "no accumulator for {}", def.key);
        }
        assert_eq!(tally.total(), 10);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut tally = Tally::default();
        assert!(!tally.record("gke-clusters", 5));
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_total_is_sum_of_accumulators() {
        let mut tally = Tally::default();
        tally.record("compute-instances", 3);
        tally.record("storage-buckets", 2);
        tally.record("sql-instances", 5);
        assert_eq!(tally.total(), 10);
        assert_eq!(tally.get("compute-instances"), Some(3));
        assert_eq!(tally.get("storage-buckets"), Some(2));
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut tally = Tally::default();
        tally.record("redis-instances", 7);
        tally.reset();
        assert_eq!(tally, Tally::default());
    }

    #[test]
    fn test_absorb_adds_field_by_field() {
        let mut global = Tally::default();

        let mut project_a = Tally::default();
        project_a.record("storage-buckets", 2);

        let mut project_b = Tally::default();
        project_b.record("sql-instances", 5);

        global.absorb(&project_a);
        global.absorb(&project_b);

        assert_eq!(global.get("storage-buckets"), Some(2));
        assert_eq!(global.get("sql-instances"), Some(5));
        assert_eq!(global.total(), 7);
        assert_eq!(global.total(), project_a.total() + project_b.total());
    }

    #[test]
    fn test_absorb_then_reset_does_not_double_count() {
        let mut global = Tally::default();
        let mut project = Tally::default();

        project.record("compute-instances", 3);
        global.absorb(&project);
        project.reset();

        project.record("compute-instances", 4);
        global.absorb(&project);

        assert_eq!(global.get("compute-instances"), Some(7));
    }
}
