//! Fees, payments and expenses, plus the summary behind the finance dashboard
//!
//! Amounts are integer cents.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sync::{Entity, EntityId};

/// Amount owed by a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub id: EntityId,
    pub student_id: EntityId,
    pub label: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
}

impl Entity for Fee {
    const NAME: &'static str = "Fee";
    const FIELDS: &'static [&'static str] = &["student_id", "label", "amount_cents", "due_date"];

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Cheque,
    Transfer,
    MobileMoney,
}

/// Money received against a fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: EntityId,
    pub fee_id: EntityId,
    pub amount_cents: i64,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
}

impl Entity for Payment {
    const NAME: &'static str = "Payment";
    const FIELDS: &'static [&'static str] = &["fee_id", "amount_cents", "paid_on", "method"];

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Money spent by the school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: EntityId,
    pub label: String,
    pub category: String,
    pub amount_cents: i64,
    pub spent_on: NaiveDate,
}

impl Entity for Expense {
    const NAME: &'static str = "Expense";
    const FIELDS: &'static [&'static str] = &["label", "category", "amount_cents", "spent_on"];

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Outstanding balance of a single fee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBalance {
    pub fee_id: EntityId,
    pub student_id: EntityId,
    pub outstanding_cents: i64,
    pub overdue: bool,
}

/// Totals shown on the finance dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinanceSummary {
    pub billed_cents: i64,
    pub collected_cents: i64,
    pub outstanding_cents: i64,
    pub spent_cents: i64,
    /// Collected minus spent
    pub balance_cents: i64,
    /// Fees with something left to pay, in fee order
    pub open_fees: Vec<FeeBalance>,
    pub spent_by_category: BTreeMap<String, i64>,
}

impl FinanceSummary {
    /// Summarize the given lists as of `today`
    ///
    /// Overpayment of a fee does not offset other fees. Payments against
    /// unknown fees count as collected but settle nothing.
    pub fn compute(fees: &[Fee], payments: &[Payment], expenses: &[Expense], today: NaiveDate) -> Self {
        let mut paid_per_fee: HashMap<EntityId, i64> = HashMap::new();
        for payment in payments {
            *paid_per_fee.entry(payment.fee_id).or_default() += payment.amount_cents;
        }

        let open_fees: Vec<FeeBalance> = fees
            .iter()
            .filter_map(|fee| {
                let paid = paid_per_fee.get(&fee.id).copied().unwrap_or(0);
                let outstanding = (fee.amount_cents - paid).max(0);
                (outstanding > 0).then(|| FeeBalance {
                    fee_id: fee.id,
                    student_id: fee.student_id,
                    outstanding_cents: outstanding,
                    overdue: fee.due_date < today,
                })
            })
            .collect();

        let mut spent_by_category = BTreeMap::new();
        for expense in expenses {
            *spent_by_category.entry(expense.category.clone()).or_default() += expense.amount_cents;
        }

        let collected_cents: i64 = payments.iter().map(|p| p.amount_cents).sum();
        let spent_cents: i64 = expenses.iter().map(|e| e.amount_cents).sum();

        Self {
            billed_cents: fees.iter().map(|f| f.amount_cents).sum(),
            collected_cents,
            outstanding_cents: open_fees.iter().map(|f| f.outstanding_cents).sum(),
            spent_cents,
            balance_cents: collected_cents - spent_cents,
            open_fees,
            spent_by_category,
        }
    }

    pub fn overdue(&self) -> impl Iterator<Item = &FeeBalance> {
        self.open_fees.iter().filter(|f| f.overdue)
    }

    /// Outstanding total for one student
    pub fn outstanding_for(&self, student_id: EntityId) -> i64 {
        self.open_fees
            .iter()
            .filter(|f| f.student_id == student_id)
            .map(|f| f.outstanding_cents)
            .sum()
    }
}
