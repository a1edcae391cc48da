//! Database model for key-value entries.

use diesel::prelude::*;

/// One row of `kv_entries`
#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::kv_entries)]
pub struct KvEntryDB {
    pub entry_key: String,
    pub entry_value: String,
}
