// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation logic for the Primly resources.

pub mod mysqlcluster;
pub mod retry;
pub mod status;

pub use mysqlcluster::reconcile_mysqlcluster;
