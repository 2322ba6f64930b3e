//! Record to entity conversion

use std::sync::Arc;

use crate::error::ParseError;
use crate::loan::Loan;
use crate::portal::PortalContext;
use crate::record::Record;

/// Wraps extracted rows into [`Loan`]s bound to the portal session.
#[derive(Debug, Clone)]
pub struct RecordRepository {
    context: Arc<PortalContext>,
}

impl RecordRepository {
    pub fn new(context: Arc<PortalContext>) -> Self {
        Self { context }
    }

    pub fn to_entity(&self, record: Record) -> Result<Loan, ParseError> {
        Loan::from_record(record, Arc::clone(&self.context))
    }

    /// Converts every row or none.
    pub fn to_entities(&self, records: Vec<Record>) -> Result<Vec<Loan>, ParseError> {
        records
            .into_iter()
            .map(|record| self.to_entity(record))
            .collect()
    }
}
