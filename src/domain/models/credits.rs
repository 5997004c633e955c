// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditUsage {
    pub id: Uuid,
    pub org_id: Uuid,
    pub credits_used: i64,
    pub credits_limit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditUsage {
    /// Remaining balance. May go negative: credits are checked before a
    /// batch starts and debited once at the end, never re-checked mid-flight.
    pub fn remaining(&self) -> i64 {
        self.credits_limit - self.credits_used
    }

    pub fn is_exhausted(&self) -> bool {
        self.credits_used >= self.credits_limit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditHistory {
    pub id: Uuid,
    pub org_id: Uuid,
    pub amount: i64, // Positive for credits consumed
    pub operation: CreditOperation,
    pub description: String,
    pub reference_id: Option<Uuid>, // Search, enrichment batch, etc.
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditOperation {
    SearchRun,
    Enrichment,
    ManualAdjustment,
}

impl std::fmt::Display for CreditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditOperation::SearchRun => write!(f, "search_run"),
            CreditOperation::Enrichment => write!(f, "enrichment"),
            CreditOperation::ManualAdjustment => write!(f, "manual_adjustment"),
        }
    }
}

impl std::str::FromStr for CreditOperation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search_run" => Ok(CreditOperation::SearchRun),
            "enrichment" => Ok(CreditOperation::Enrichment),
            "manual_adjustment" => Ok(CreditOperation::ManualAdjustment),
            _ => Err(()),
        }
    }
}
