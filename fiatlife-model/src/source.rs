use crate::Bill;
use std::collections::BTreeMap;

/// Where a bill in the merged list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillSource {
    /// Stored by FiatLife as app data (kind 30078).
    Native,
    /// Imported from a CypherLog subscription (kind 37004).
    CypherLog,
}

/// A bill together with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BillWithSource {
    pub bill: Bill,
    pub source: BillSource,
    /// CypherLog tags FiatLife does not interpret (company ids, linked
    /// assets, ...). Re-emitted verbatim when the subscription is edited.
    pub preserved_tags: Option<BTreeMap<String, Vec<String>>>,
}

impl BillWithSource {
    pub fn native(bill: Bill) -> Self {
        Self {
            bill,
            source: BillSource::Native,
            preserved_tags: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.bill.id
    }

    pub fn is_cypherlog(&self) -> bool {
        self.source == BillSource::CypherLog
    }
}
