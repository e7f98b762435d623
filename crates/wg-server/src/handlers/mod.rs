// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Request handlers

pub mod files;
pub mod health;
pub mod tenants;
pub mod upload;
pub mod wikis;
