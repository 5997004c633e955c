// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod company_repo_impl;
pub mod credits_repo_impl;
pub mod employee_cache_repo_impl;
pub mod employee_repo_impl;
pub mod enrichment_transaction_repo_impl;
pub mod job_repo_impl;
pub mod lead_repo_impl;
pub mod scraper_run_repo_impl;
pub mod search_repo_impl;
