// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! MySQL error types.

use thiserror::Error;

/// Errors produced by the MySQL accessor and the status queries.
#[derive(Error, Debug)]
pub enum MySqlError {
    /// A query that must return a row returned none.
    ///
    /// `SHOW MASTER STATUS` and the global-variables select always produce a
    /// row on a healthy server; an empty result means the instance is not in
    /// a usable state.
    #[error("query '{query}' returned no rows")]
    EmptyResultSet {
        /// The query that came back empty
        query: &'static str,
    },

    /// A result row is missing an expected column or the value could not be
    /// decoded into the expected type.
    #[error("column '{column}' missing or unreadable in result of '{query}'")]
    Column {
        /// The query whose result was being decoded
        query: &'static str,
        /// The column that failed to decode
        column: &'static str,
    },

    /// Any other error from the MySQL client.
    #[error(transparent)]
    MySql(#[from] mysql_async::Error),
}
