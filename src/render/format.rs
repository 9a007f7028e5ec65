/*
 * Folio, personal portfolio content server.
 * Copyright (c) 2024 Folio contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or any later version.
 */

//! Small formatting helpers shared by the module renderers

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Human-readable size with 1024-based units and two decimals above bytes
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    }
}

/// Icon for a file type; unknown types get a folder
pub fn file_icon(file_type: &str) -> &'static str {
    match file_type.to_ascii_lowercase().as_str() {
        "pdf" => "📄",
        "doc" | "docx" => "📝",
        "txt" => "📃",
        "zip" | "rar" => "📦",
        "mp4" | "avi" | "mkv" => "🎬",
        "mp3" => "🎵",
        "xlsx" | "xls" => "📊",
        "ppt" | "pptx" => "📽️",
        _ => "📁",
    }
}

/// Escape text for HTML bodies and double-quoted attributes
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
