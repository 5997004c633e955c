// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod company;
pub mod credit_history;
pub mod credit_usage;
pub mod employee;
pub mod employee_cache;
pub mod enrichment_transaction;
pub mod job;
pub mod lead;
pub mod organization;
pub mod scraper_run;
pub mod search;
