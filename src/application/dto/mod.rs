// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod credits_response;
pub mod enrich_request;
pub mod enrich_response;
pub mod phone_webhook;
pub mod preview_response;
pub mod run_request;
pub mod run_response;
