// src/utils/html.rs

/// Strips unsafe markup from teacher-authored text (question text, exam
/// descriptions) before it is stored and later rendered to students.
///
/// Whitelist-based: harmless formatting such as <b> or <sub> survives,
/// <script> and event-handler attributes do not.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
