use api_types::{
    account::NewAccount,
    transaction::{NewTransaction, TransactionType},
};

use crate::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Amount,
    Type,
    Category,
    Account,
    PaymentMode,
    Note,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        Self::Date,
        Self::Amount,
        Self::Type,
        Self::Category,
        Self::Account,
        Self::PaymentMode,
        Self::Note,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::Type => "Type",
            Self::Category => "Category",
            Self::Account => "Account",
            Self::PaymentMode => "Payment mode",
            Self::Note => "Note",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Self::Note)
    }
}

/// In-progress input for a new transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub date: String,
    pub amount: String,
    pub kind: TransactionType,
    pub category: String,
    /// Free text; suggestions come from the loaded accounts but nothing
    /// checks that the account exists.
    pub account: String,
    pub payment_mode: String,
    pub note: String,
}

impl TransactionForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Text value of a field. `Type` has none: it is toggled, not typed.
    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Date => Some(&mut self.date),
            FormField::Amount => Some(&mut self.amount),
            FormField::Type => None,
            FormField::Category => Some(&mut self.category),
            FormField::Account => Some(&mut self.account),
            FormField::PaymentMode => Some(&mut self.payment_mode),
            FormField::Note => Some(&mut self.note),
        }
    }

    pub fn text(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Amount => &self.amount,
            FormField::Type => self.kind.label(),
            FormField::Category => &self.category,
            FormField::Account => &self.account,
            FormField::PaymentMode => &self.payment_mode,
            FormField::Note => &self.note,
        }
    }

    /// Builds the create body.
    ///
    /// Only presence of the required fields is checked; the amount is sent
    /// as typed and the server decides whether it is a number.
    pub fn to_payload(&self) -> Result<NewTransaction, EngineError> {
        for field in FormField::ALL {
            if field.is_required() && field != FormField::Type && self.text(field).trim().is_empty()
            {
                return Err(EngineError::MissingField(field.label()));
            }
        }

        Ok(NewTransaction {
            date: self.date.trim().to_string(),
            amount: self.amount.trim().to_string(),
            kind: self.kind,
            category: self.category.clone(),
            account: self.account.clone(),
            payment_mode: self.payment_mode.clone(),
            note: self.note.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Name,
    Description,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    pub name: String,
    pub description: String,
}

impl AccountForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn field_mut(&mut self, field: AccountField) -> &mut String {
        match field {
            AccountField::Name => &mut self.name,
            AccountField::Description => &mut self.description,
        }
    }

    /// `None` when the name is blank: submitting is then a no-op.
    pub fn to_payload(&self) -> Option<NewAccount> {
        if self.name.trim().is_empty() {
            return None;
        }
        Some(NewAccount {
            name: self.name.clone(),
            description: self.description.clone(),
        })
    }
}
