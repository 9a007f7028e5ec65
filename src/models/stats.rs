/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Visit statistics

use serde::{Deserialize, Serialize};

/// Number of visitor log entries kept
pub const VISITOR_LOG_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorLog {
    pub ip: String,
    pub timestamp: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub last_visit: Option<String>,
    #[serde(default)]
    pub visitor_logs: Vec<VisitorLog>,
}

impl Stats {
    /// Count a visit and append it to the bounded visitor log
    pub fn record(&mut self, log: VisitorLog) {
        self.visits += 1;
        self.last_visit = Some(log.timestamp.clone());
        self.visitor_logs.push(log);
        if self.visitor_logs.len() > VISITOR_LOG_LIMIT {
            let excess = self.visitor_logs.len() - VISITOR_LOG_LIMIT;
            self.visitor_logs.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(n: usize) -> VisitorLog {
        VisitorLog {
            ip: format!("10.0.0.{}", n),
            timestamp: format!("2024-01-01 00:00:{:02}", n % 60),
            user_agent: "test".into(),
        }
    }

    #[test]
    fn record_counts_and_stamps() {
        let mut stats = Stats::default();
        stats.record(log(1));
        assert_eq!(stats.visits, 1);
        assert_eq!(stats.last_visit.as_deref(), Some("2024-01-01 00:00:01"));
    }

    #[test]
    fn visitor_log_keeps_most_recent() {
        let mut stats = Stats::default();
        for n in 0..VISITOR_LOG_LIMIT + 5 {
            stats.record(log(n));
        }
        assert_eq!(stats.visits, (VISITOR_LOG_LIMIT + 5) as u64);
        assert_eq!(stats.visitor_logs.len(), VISITOR_LOG_LIMIT);
        assert_eq!(stats.visitor_logs[0].ip, "10.0.0.5");
    }
}
