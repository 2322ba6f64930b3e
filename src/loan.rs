//! Loan entity
//!
//! Wraps one row of the loans table. Public field names are translated to the
//! portal's Portuguese column headers and detail-page labels through
//! [`LoanField`]. Observation, barcode and loan date only exist on the detail
//! page; they are fetched together, once, on first access.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock, OnceLock};

use regex::Regex;
use tracing::debug;

use crate::error::{ParseError, Result, UnknownFieldError};
use crate::extractors::extract_pairs;
use crate::links::PortalFunction;
use crate::portal::PortalContext;
use crate::record::{FieldValue, Record};

/// Column holding the loan number link.
pub const NUMBER_COLUMN: &str = "N.";

static RE_DOC_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdoc_number=([0-9]+)").expect("invalid regex: doc_number"));
static RE_ITEM_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bitem_sequence=([0-9]+)").expect("invalid regex: item_sequence")
});
static RE_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bindex=([0-9]+)").expect("invalid regex: index"));

/// Public loan fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanField {
    Number,
    Link,
    DocumentId,
    SequenceId,
    IndexId,
    Observation,
    Barcode,
    Date,
    Description,
    Title,
    ExpectedReturnDate,
    Author,
    Library,
    Debt,
}

impl LoanField {
    pub const ALL: [LoanField; 14] = [
        LoanField::Number,
        LoanField::Link,
        LoanField::DocumentId,
        LoanField::SequenceId,
        LoanField::IndexId,
        LoanField::Observation,
        LoanField::Barcode,
        LoanField::Date,
        LoanField::Description,
        LoanField::Title,
        LoanField::ExpectedReturnDate,
        LoanField::Author,
        LoanField::Library,
        LoanField::Debt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LoanField::Number => "number",
            LoanField::Link => "link",
            LoanField::DocumentId => "document_id",
            LoanField::SequenceId => "sequence_id",
            LoanField::IndexId => "index_id",
            LoanField::Observation => "observation",
            LoanField::Barcode => "barcode",
            LoanField::Date => "date",
            LoanField::Description => "description",
            LoanField::Title => "title",
            LoanField::ExpectedReturnDate => "expected_return_date",
            LoanField::Author => "author",
            LoanField::Library => "library",
            LoanField::Debt => "debt",
        }
    }

    fn camel_name(self) -> &'static str {
        match self {
            LoanField::DocumentId => "documentId",
            LoanField::SequenceId => "sequenceId",
            LoanField::IndexId => "indexId",
            LoanField::ExpectedReturnDate => "expectedReturnDate",
            other => other.name(),
        }
    }

    /// Portal header or detail label, `None` for values derived from the row link.
    pub fn upstream_label(self) -> Option<&'static str> {
        match self {
            LoanField::Number => Some(NUMBER_COLUMN),
            LoanField::Link
            | LoanField::DocumentId
            | LoanField::SequenceId
            | LoanField::IndexId => None,
            LoanField::Observation => Some("Observação"),
            LoanField::Barcode => Some("Código de barras"),
            LoanField::Date => Some("Data empréstimo"),
            LoanField::Description => Some("Descrição"),
            LoanField::Title => Some("Título"),
            LoanField::ExpectedReturnDate => Some("Data prev. devolução"),
            LoanField::Author => Some("Autor"),
            LoanField::Library => Some("Biblioteca"),
            LoanField::Debt => Some("Débito"),
        }
    }

    /// Only available from the detail page.
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            LoanField::Observation | LoanField::Barcode | LoanField::Date
        )
    }
}

impl FromStr for LoanField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LoanField::ALL
            .into_iter()
            .find(|field| field.name() == s || field.camel_name() == s)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

impl fmt::Display for LoanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields loaded from the loan detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedFields {
    pub observation: String,
    pub barcode: String,
    pub loan_date: String,
    /// Every label/value pair of the page.
    pub details: HashMap<String, String>,
}

impl ExtendedFields {
    pub fn from_details(details: HashMap<String, String>) -> std::result::Result<Self, ParseError> {
        let take = |field: LoanField| -> std::result::Result<String, ParseError> {
            let label = field.upstream_label().unwrap_or_default();
            details
                .get(label)
                .cloned()
                .ok_or_else(|| ParseError::MissingDetailLabel(label.to_string()))
        };

        Ok(Self {
            observation: take(LoanField::Observation)?,
            barcode: take(LoanField::Barcode)?,
            loan_date: take(LoanField::Date)?,
            details,
        })
    }
}

/// One current loan.
pub struct Loan {
    record: Record,
    number: String,
    link: String,
    document_id: String,
    sequence_id: String,
    index_id: String,
    extended: OnceLock<ExtendedFields>,
    context: Arc<PortalContext>,
}

impl Loan {
    pub(crate) fn from_record(
        record: Record,
        context: Arc<PortalContext>,
    ) -> std::result::Result<Self, ParseError> {
        let (number, link) = match record.get(NUMBER_COLUMN) {
            Some(FieldValue::Link { text, href }) => (text.clone(), href.clone()),
            Some(FieldValue::Text(text)) => {
                return Err(ParseError::MalformedRowLink(format!(
                    "loan number {:?} has no link",
                    text
                )));
            }
            None => return Err(ParseError::MissingColumn(NUMBER_COLUMN.to_string())),
        };

        let document_id = link_param(&RE_DOC_NUMBER, &link, "doc_number")?;
        let sequence_id = link_param(&RE_ITEM_SEQUENCE, &link, "item_sequence")?;
        let index_id = link_param(&RE_INDEX, &link, "index")?;

        Ok(Self {
            record,
            number,
            link,
            document_id,
            sequence_id,
            index_id,
            extended: OnceLock::new(),
            context,
        })
    }

    /// Loan number as displayed, e.g. `001`.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Raw href of the number cell.
    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    pub fn description(&self) -> std::result::Result<&str, ParseError> {
        self.summary_text(LoanField::Description)
    }

    pub fn title(&self) -> std::result::Result<&str, ParseError> {
        self.summary_text(LoanField::Title)
    }

    pub fn expected_return_date(&self) -> std::result::Result<&str, ParseError> {
        self.summary_text(LoanField::ExpectedReturnDate)
    }

    pub fn author(&self) -> std::result::Result<&str, ParseError> {
        self.summary_text(LoanField::Author)
    }

    pub fn library(&self) -> std::result::Result<&str, ParseError> {
        self.summary_text(LoanField::Library)
    }

    pub fn debt(&self) -> std::result::Result<&str, ParseError> {
        self.summary_text(LoanField::Debt)
    }

    pub fn observation(&self) -> Result<&str> {
        Ok(&self.extended()?.observation)
    }

    pub fn barcode(&self) -> Result<&str> {
        Ok(&self.extended()?.barcode)
    }

    /// Date the item was lent.
    pub fn date(&self) -> Result<&str> {
        Ok(&self.extended()?.loan_date)
    }

    /// All label/value pairs of the detail page.
    pub fn details(&self) -> Result<&HashMap<String, String>> {
        Ok(&self.extended()?.details)
    }

    /// Summary row as extracted.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Look a field up by its public name.
    ///
    /// Names are resolved only through [`LoanField`]; raw headers are not accepted.
    pub fn get(&self, name: &str) -> Result<FieldValue> {
        let field: LoanField = name.parse()?;
        self.field(field)
    }

    pub fn field(&self, field: LoanField) -> Result<FieldValue> {
        let value = match field {
            LoanField::Number => FieldValue::Text(self.number.clone()),
            LoanField::Link => FieldValue::Text(self.link.clone()),
            LoanField::DocumentId => FieldValue::Text(self.document_id.clone()),
            LoanField::SequenceId => FieldValue::Text(self.sequence_id.clone()),
            LoanField::IndexId => FieldValue::Text(self.index_id.clone()),
            LoanField::Observation => FieldValue::from(self.observation()?),
            LoanField::Barcode => FieldValue::from(self.barcode()?),
            LoanField::Date => FieldValue::from(self.date()?),
            summary => self.summary(summary)?.clone(),
        };
        Ok(value)
    }

    fn summary(&self, field: LoanField) -> std::result::Result<&FieldValue, ParseError> {
        let label = field.upstream_label().unwrap_or_default();
        self.record
            .get(label)
            .ok_or_else(|| ParseError::MissingColumn(label.to_string()))
    }

    fn summary_text(&self, field: LoanField) -> std::result::Result<&str, ParseError> {
        self.summary(field).map(FieldValue::text)
    }

    fn extended(&self) -> Result<&ExtendedFields> {
        if let Some(fields) = self.extended.get() {
            return Ok(fields);
        }

        let fields = self.load_extended()?;
        Ok(self.extended.get_or_init(|| fields))
    }

    fn load_extended(&self) -> Result<ExtendedFields> {
        debug!(
            document_id = %self.document_id,
            sequence_id = %self.sequence_id,
            "Loading loan details"
        );
        let document = self.context.fetch(
            PortalFunction::LoanDetail,
            &[
                ("doc_number", self.document_id.as_str()),
                ("item_sequence", self.sequence_id.as_str()),
                ("index", self.index_id.as_str()),
            ],
        )?;
        let details = extract_pairs(&document)?;
        Ok(ExtendedFields::from_details(details)?)
    }
}

impl fmt::Debug for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loan")
            .field("number", &self.number)
            .field("document_id", &self.document_id)
            .field("sequence_id", &self.sequence_id)
            .field("index_id", &self.index_id)
            .field("record", &self.record)
            .field("extended", &self.extended.get())
            .finish_non_exhaustive()
    }
}

fn link_param(re: &Regex, href: &str, key: &str) -> std::result::Result<String, ParseError> {
    re.captures(href)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ParseError::MalformedRowLink(format!("no {} in {:?}", key, href)))
}
