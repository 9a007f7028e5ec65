/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Operator notifications

use std::time::Duration;

use serde::Serialize;

/// How long a transient notice stays on screen
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Severity class of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

/// When a notice goes away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismiss {
    After(Duration),
    /// Stays until the operator closes it
    Persistent,
}

/// A banner shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub dismiss: Dismiss,
}

impl Notice {
    /// Auto-dismissing notice
    pub fn transient(severity: Severity, message: impl Into<String>) -> Self {
        Notice {
            severity,
            message: message.into(),
            dismiss: Dismiss::After(NOTICE_DURATION),
        }
    }

    pub fn persistent(severity: Severity, message: impl Into<String>) -> Self {
        Notice {
            severity,
            message: message.into(),
            dismiss: Dismiss::Persistent,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::transient(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::transient(Severity::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_persistent(&self) -> bool {
        self.dismiss == Dismiss::Persistent
    }
}
