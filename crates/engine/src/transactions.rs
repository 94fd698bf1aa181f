//! Transaction primitives.
//!
//! A `Transaction` is either an earning from a platform or a categorized
//! expense. Records are immutable once stored: edits are expressed as
//! replacement records that keep the original `id` (see [`crate::planner`]).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ExpenseCategory, Liters, MoneyCents, Platform, ValidationError,
    util::{ensure_entry_amount, noon_utc, normalize_optional_text, parse_uuid},
};

/// Discriminant of a [`TransactionKind`], used for raw input and storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Earning,
    Expense,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Earning => "earning",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for EntryType {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "earning" => Ok(Self::Earning),
            "expense" => Ok(Self::Expense),
            _ => Err(ValidationError::MissingField("type")),
        }
    }
}

/// Kind-specific fields of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    Earning {
        platform: Platform,
    },
    Expense {
        category: ExpenseCategory,
        liters: Option<Liters>,
    },
}

impl TransactionKind {
    pub fn entry_type(self) -> EntryType {
        match self {
            Self::Earning { .. } => EntryType::Earning,
            Self::Expense { .. } => EntryType::Expense,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
}

impl Transaction {
    /// Builds an earning pinned to noon of `date` with a fresh id.
    pub fn earning(
        platform: Platform,
        amount: MoneyCents,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        ensure_entry_amount(amount, "amount")?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Earning { platform },
            amount,
            occurred_at: noon_utc(date),
            description: None,
        })
    }

    /// Builds an expense pinned to noon of `date` with a fresh id.
    pub fn expense(
        category: ExpenseCategory,
        liters: Option<Liters>,
        amount: MoneyCents,
        date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        ensure_entry_amount(amount, "amount")?;
        ensure_liters_allowed(category, liters)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Expense { category, liters },
            amount,
            occurred_at: noon_utc(date),
            description: None,
        })
    }

    /// Calendar day (UTC) the transaction is bucketed under.
    pub fn day(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }

    pub fn is_earning(&self) -> bool {
        matches!(self.kind, TransactionKind::Earning { .. })
    }

    pub fn platform(&self) -> Option<Platform> {
        match self.kind {
            TransactionKind::Earning { platform } => Some(platform),
            TransactionKind::Expense { .. } => None,
        }
    }

    pub fn category(&self) -> Option<ExpenseCategory> {
        match self.kind {
            TransactionKind::Expense { category, .. } => Some(category),
            TransactionKind::Earning { .. } => None,
        }
    }
}

fn ensure_liters_allowed(
    category: ExpenseCategory,
    liters: Option<Liters>,
) -> Result<(), ValidationError> {
    if liters.is_some() && !category.tracks_liters() {
        return Err(ValidationError::UnexpectedField {
            field: "liters",
            kind: category.as_str(),
        });
    }
    Ok(())
}

/// Raw, unvalidated input for a new transaction.
///
/// Every field is optional so that missing input is reported by
/// [`TransactionDraft::validate`] instead of being impossible to express.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub entry_type: Option<EntryType>,
    pub amount: Option<String>,
    /// Calendar date; today when omitted.
    pub date: Option<NaiveDate>,
    pub platform: Option<String>,
    pub category: Option<String>,
    pub liters: Option<String>,
    pub description: Option<String>,
}

impl TransactionDraft {
    pub fn earning(platform: &str, amount: &str) -> Self {
        Self {
            entry_type: Some(EntryType::Earning),
            amount: Some(amount.to_string()),
            platform: Some(platform.to_string()),
            ..Self::default()
        }
    }

    pub fn expense(category: &str, amount: &str) -> Self {
        Self {
            entry_type: Some(EntryType::Expense),
            amount: Some(amount.to_string()),
            category: Some(category.to_string()),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_liters(mut self, liters: &str) -> Self {
        self.liters = Some(liters.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Validates the draft, dating it today when no date was given.
    pub fn validate(self) -> Result<Transaction, ValidationError> {
        self.validate_at(Utc::now())
    }

    /// Validates the draft against an explicit "now".
    pub fn validate_at(self, now: DateTime<Utc>) -> Result<Transaction, ValidationError> {
        let entry_type = self
            .entry_type
            .ok_or(ValidationError::MissingField("type"))?;
        let amount: MoneyCents = self
            .amount
            .as_deref()
            .ok_or(ValidationError::MissingField("amount"))?
            .parse()?;
        let date = self.date.unwrap_or_else(|| now.date_naive());
        let liters = normalize_optional_text(self.liters.as_deref());
        let description = normalize_optional_text(self.description.as_deref());

        let mut tx = match entry_type {
            EntryType::Earning => {
                if self.category.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "category",
                        kind: entry_type.as_str(),
                    });
                }
                if liters.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "liters",
                        kind: entry_type.as_str(),
                    });
                }
                if description.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "description",
                        kind: entry_type.as_str(),
                    });
                }
                let platform = self
                    .platform
                    .as_deref()
                    .ok_or(ValidationError::MissingField("platform"))?;
                Transaction::earning(Platform::try_from(platform)?, amount, date)?
            }
            EntryType::Expense => {
                if self.platform.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "platform",
                        kind: entry_type.as_str(),
                    });
                }
                let category = self
                    .category
                    .as_deref()
                    .ok_or(ValidationError::MissingField("category"))?;
                let liters = liters.as_deref().map(str::parse::<Liters>).transpose()?;
                Transaction::expense(ExpenseCategory::try_from(category)?, liters, amount, date)?
            }
        };
        tx.description = description;
        Ok(tx)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub occurred_at: DateTimeUtc,
    pub platform: Option<String>,
    pub category: Option<String>,
    pub liters_centi: Option<i64>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        let (platform, category, liters) = match tx.kind {
            TransactionKind::Earning { platform } => (Some(platform.as_str()), None, None),
            TransactionKind::Expense { category, liters } => (
                None,
                Some(category.as_str()),
                liters.map(|l| i64::from(l.centiliters())),
            ),
        };
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.entry_type().as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            platform: ActiveValue::Set(platform.map(ToString::to_string)),
            category: ActiveValue::Set(category.map(ToString::to_string)),
            liters_centi: ActiveValue::Set(liters),
            description: ActiveValue::Set(tx.description.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = match EntryType::try_from(model.kind.as_str())? {
            EntryType::Earning => {
                let platform = model
                    .platform
                    .as_deref()
                    .ok_or(ValidationError::MissingField("platform"))?;
                TransactionKind::Earning {
                    platform: Platform::try_from(platform)?,
                }
            }
            EntryType::Expense => {
                let category = model
                    .category
                    .as_deref()
                    .ok_or(ValidationError::MissingField("category"))?;
                let liters = model
                    .liters_centi
                    .map(|value| {
                        u32::try_from(value)
                            .map(Liters::from_centiliters)
                            .map_err(|_| ValidationError::InvalidLiters(value.to_string()))
                    })
                    .transpose()?;
                TransactionKind::Expense {
                    category: ExpenseCategory::try_from(category)?,
                    liters,
                }
            }
        };
        let amount = MoneyCents::new(model.amount_minor);
        ensure_entry_amount(amount, "amount")?;
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            kind,
            amount,
            occurred_at: model.occurred_at,
            description: model.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 23, 45, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn earning_draft_defaults_to_noon_today() {
        let tx = TransactionDraft::earning("uber", "120,50")
            .validate_at(now())
            .unwrap();
        assert_eq!(tx.platform(), Some(Platform::Uber));
        assert_eq!(tx.amount, MoneyCents::new(12_050));
        assert_eq!(tx.day(), day(14));
        assert_eq!(tx.occurred_at.hour(), 12);
    }

    #[test]
    fn explicit_date_is_pinned_to_noon() {
        let tx = TransactionDraft::expense("fuel", "200")
            .with_date(day(2))
            .with_liters("35,2")
            .with_description("  full tank ")
            .validate_at(now())
            .unwrap();
        assert_eq!(tx.day(), day(2));
        assert_eq!(tx.occurred_at.hour(), 12);
        assert_eq!(
            tx.kind,
            TransactionKind::Expense {
                category: ExpenseCategory::Fuel,
                liters: Some(Liters::from_centiliters(3520)),
            }
        );
        assert_eq!(tx.description.as_deref(), Some("full tank"));
    }

    #[test]
    fn zero_amount_is_valid() {
        let tx = TransactionDraft::earning("99", "0").validate_at(now()).unwrap();
        assert!(tx.amount.is_zero());
    }

    #[test]
    fn earnings_do_not_take_a_description() {
        let err = TransactionDraft::earning("uber", "10")
            .with_description("airport run")
            .validate_at(now())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedField {
                field: "description",
                kind: "earning",
            }
        );
        let blank = TransactionDraft::earning("uber", "10").with_description("  ");
        assert!(blank.validate_at(now()).is_ok());
    }

    #[test]
    fn rejects_amounts_above_the_entry_limit() {
        let err = TransactionDraft::earning("uber", "92233720368547758.07")
            .validate_at(now())
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount(_)));
        let max = MoneyCents::MAX_ENTRY.to_string();
        assert!(TransactionDraft::earning("uber", &max).validate_at(now()).is_ok());
    }

    #[test]
    fn rejects_negative_or_non_numeric_amounts() {
        let err = TransactionDraft::earning("uber", "-1")
            .validate_at(now())
            .unwrap_err();
        assert_eq!(err.field(), "amount");
        let err = TransactionDraft::expense("food", "twelve")
            .validate_at(now())
            .unwrap_err();
        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn rejects_missing_kind_specific_fields() {
        let mut draft = TransactionDraft::earning("uber", "10");
        draft.platform = None;
        assert_eq!(
            draft.validate_at(now()),
            Err(ValidationError::MissingField("platform"))
        );

        let mut draft = TransactionDraft::expense("food", "10");
        draft.category = None;
        assert_eq!(
            draft.validate_at(now()),
            Err(ValidationError::MissingField("category"))
        );

        let draft = TransactionDraft {
            amount: Some("10".to_string()),
            ..TransactionDraft::default()
        };
        assert_eq!(
            draft.validate_at(now()),
            Err(ValidationError::MissingField("type"))
        );
    }

    #[test]
    fn rejects_fields_of_the_other_kind() {
        let mut draft = TransactionDraft::earning("uber", "10");
        draft.category = Some("fuel".to_string());
        assert!(matches!(
            draft.validate_at(now()),
            Err(ValidationError::UnexpectedField {
                field: "category",
                ..
            })
        ));

        let err = TransactionDraft::expense("food", "10")
            .with_liters("3")
            .validate_at(now())
            .unwrap_err();
        assert_eq!(err.field(), "liters");
    }

    #[test]
    fn rejects_negative_liters_and_unknown_enums() {
        let err = TransactionDraft::expense("fuel", "10")
            .with_liters("-2")
            .validate_at(now())
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLiters(_)));

        let err = TransactionDraft::earning("lyft", "10")
            .validate_at(now())
            .unwrap_err();
        assert_eq!(err.field(), "platform");

        let err = TransactionDraft::expense("parking", "10")
            .validate_at(now())
            .unwrap_err();
        assert_eq!(err.field(), "category");
    }

    #[test]
    fn blank_liters_are_ignored() {
        let tx = TransactionDraft::expense("fuel", "10")
            .with_liters(" ")
            .validate_at(now())
            .unwrap();
        assert_eq!(
            tx.kind,
            TransactionKind::Expense {
                category: ExpenseCategory::Fuel,
                liters: None,
            }
        );
    }

    #[test]
    fn model_conversion_preserves_fields() {
        let tx = Transaction::expense(
            ExpenseCategory::Fuel,
            Some(Liters::from_centiliters(1000)),
            MoneyCents::new(5_000),
            day(3),
        )
        .unwrap();
        let active = ActiveModel::from(&tx);
        let model = Model {
            id: active.id.unwrap(),
            kind: active.kind.unwrap(),
            amount_minor: active.amount_minor.unwrap(),
            occurred_at: active.occurred_at.unwrap(),
            platform: active.platform.unwrap(),
            category: active.category.unwrap(),
            liters_centi: active.liters_centi.unwrap(),
            description: active.description.unwrap(),
        };
        assert_eq!(model.kind, "expense");
        assert_eq!(model.category.as_deref(), Some("fuel"));
        assert_eq!(Transaction::try_from(model).unwrap(), tx);
    }
}
