// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod enrich_companies;
pub mod phone_webhook;
pub mod run_search;
