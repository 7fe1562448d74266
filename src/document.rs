//! Line-oriented INF document with format-preserving edits.

use crate::encoding::TextEncoding;
use crate::error::{InfError, Result};
use crate::fs::{read_file, write_file};
use crate::line::KeyValuesLine;
use crate::utils::{
    contains_ignore_case, is_blank, is_broken_line, is_comment, is_header_of, is_section_header,
    physical_lines, section_name_of, trim_leading_spaces, EOF_MARKER, NEWLINE,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// A line found by [`TextDocument::get_line_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    /// Zero-based index of the physical line where the match starts.
    pub index: usize,

    /// Text of the logical line (continuations joined when requested).
    pub line: String,
}

/// An INF/SIF document held as text.
///
/// Sections are not stored; they are views recomputed from the current text
/// and cached until the next mutation. Every mutation rebuilds the whole
/// text in one pass, so lines outside the edited region keep their exact
/// bytes, terminators included.
///
/// # Caching
///
/// Section contents and the section-name list are cached with `RefCell`
/// so lookups can take `&self`. A document is therefore not `Sync`.
#[derive(Debug, Default)]
pub struct TextDocument {
    /// Working text.
    text: String,

    /// Encoding detected at load time, reused on save.
    encoding: TextEncoding,

    /// Set by every mutation, cleared by a save.
    modified: bool,

    /// Lazily built list of section names in first-seen order.
    section_names: RefCell<Option<Vec<String>>>,

    /// Cache of section contents keyed by lowercase section name.
    section_cache: RefCell<HashMap<String, Vec<String>>>,
}

impl TextDocument {
    /// Creates an empty ASCII document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from text, to be saved with the given encoding.
    pub fn from_text(text: impl Into<String>, encoding: TextEncoding) -> Self {
        Self {
            text: text.into(),
            encoding,
            ..Self::default()
        }
    }

    /// Creates a document from raw file bytes.
    ///
    /// The encoding is detected from the byte-order mark (Latin-1 when
    /// there is none) and every `"\r\r"` is collapsed to `"\r"`; Windows
    /// 2000's hivesys.inf contains such runs and they would otherwise read
    /// as extra lines in the middle of continued values.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let encoding = TextEncoding::detect(bytes);
        let mut text = encoding.decode(bytes);
        while text.contains("\r\r") {
            text = text.replace("\r\r", "\r");
        }
        Self::from_text(text, encoding)
    }

    /// Opens a document from a file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use inf_parser::TextDocument;
    ///
    /// let doc = TextDocument::open("I386/txtsetup.sif").unwrap();
    /// println!("{} sections", doc.section_names().len());
    /// ```
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = read_file(&path)?;
        debug!(size = bytes.len(), "Read document bytes");
        Ok(Self::from_bytes(&bytes))
    }

    /// Encodes the text with the document's encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encoding.encode(&self.text)
    }

    /// Writes the document back to a file and clears the modified flag.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        write_file(&path, &self.to_bytes())?;
        self.mark_saved();
        info!(encoding = self.encoding.name(), "Saved document");
        Ok(())
    }

    /// Returns the working text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the encoding used on save.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Returns true if the document changed since it was loaded or saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the number of physical lines.
    pub fn line_count(&self) -> usize {
        physical_lines(&self.text).count()
    }

    /// Returns the non-comment, non-blank lines of a section.
    ///
    /// A section may occur several times in one file; the lines of every
    /// occurrence are returned in file order.
    pub fn get_section(&self, section_name: &str) -> Vec<String> {
        let cache_key = section_name.to_lowercase();
        if let Some(lines) = self.section_cache.borrow().get(&cache_key) {
            debug!(section = section_name, "Cache hit for section");
            return lines.clone();
        }

        debug!(section = section_name, "Cache miss, scanning section");
        let mut lines = Vec::new();
        let mut inside = false;
        for (line, _) in physical_lines(&self.text) {
            if inside && is_section_header(line) {
                inside = false;
            }
            if !inside {
                inside = is_header_of(line, section_name);
                continue;
            }
            if !is_comment(line) && !line.trim().is_empty() {
                lines.push(line.to_string());
            }
        }

        self.section_cache
            .borrow_mut()
            .insert(cache_key, lines.clone());
        lines
    }

    /// Returns the names of all sections, deduplicated ignoring case, in
    /// first-seen order.
    pub fn section_names(&self) -> Vec<String> {
        if let Some(names) = self.section_names.borrow().as_ref() {
            return names.clone();
        }

        let mut names: Vec<String> = Vec::new();
        for (line, _) in physical_lines(&self.text) {
            if !is_section_header(line) {
                continue;
            }
            if let Some(name) = section_name_of(line) {
                if !contains_ignore_case(&names, name) {
                    names.push(name.to_string());
                }
            }
        }

        *self.section_names.borrow_mut() = Some(names.clone());
        names
    }

    /// Returns true if the document has a section with this name.
    pub fn contains_section(&self, section_name: &str) -> bool {
        contains_ignore_case(&self.section_names(), section_name)
    }

    /// Returns the values of the first line in the section whose key matches.
    ///
    /// Returns an empty list when the section or key is absent.
    pub fn values_of_key_in_section(&self, section_name: &str, key: &str) -> Vec<String> {
        self.get_section(section_name)
            .iter()
            .map(|line| KeyValuesLine::parse(line))
            .find(|line| line.has_key(key))
            .map(|line| line.values)
            .unwrap_or_default()
    }

    /// Finds the first line of a section satisfying `predicate`.
    ///
    /// The returned index is document-global. With `append_broken_lines`,
    /// a line ending in `\` is joined with the following physical lines
    /// (trailing backslash dropped, leading spaces of the continuation
    /// trimmed) and the predicate sees the joined logical line; the index
    /// still addresses the first physical line.
    pub fn get_line_index<F>(
        &self,
        section_name: &str,
        predicate: F,
        append_broken_lines: bool,
    ) -> Option<LineMatch>
    where
        F: Fn(&str) -> bool,
    {
        let mut lines = physical_lines(&self.text).map(|(line, _)| line).enumerate();
        let mut inside = false;
        while let Some((index, line)) = lines.next() {
            if inside && is_section_header(line) {
                inside = false;
            }
            if !inside {
                inside = is_header_of(line, section_name);
                continue;
            }

            let mut logical = line.to_string();
            if append_broken_lines {
                let mut current = line;
                while is_broken_line(current) {
                    let Some((_, next)) = lines.next() else {
                        break;
                    };
                    logical.pop();
                    logical.push_str(trim_leading_spaces(next));
                    current = next;
                }
            }

            if predicate(&logical) {
                return Some(LineMatch {
                    index,
                    line: logical,
                });
            }
        }
        None
    }

    /// Finds the first line of a section whose key matches, ignoring case.
    pub fn get_line_index_by_key(&self, section_name: &str, key: &str) -> Option<LineMatch> {
        self.get_line_index(
            section_name,
            |line| KeyValuesLine::parse(line).has_key(key),
            false,
        )
    }

    /// Finds a line of a section equal to `line_to_find`, ignoring case.
    pub fn find_line(&self, section_name: &str, line_to_find: &str) -> Option<LineMatch> {
        self.get_line_index(
            section_name,
            |line| line.eq_ignore_ascii_case(line_to_find),
            false,
        )
    }

    /// Appends a line at the end of the document.
    ///
    /// A trailing EOF marker (optionally followed by `\r\n`) is removed
    /// first: setup ignores everything after it.
    pub fn append_line(&mut self, line: &str) {
        let mut text = std::mem::take(&mut self.text);
        if text.ends_with(EOF_MARKER) {
            text.pop();
        } else if text.ends_with("\u{1A}\r\n") {
            text.truncate(text.len() - 3);
        }

        if !text.is_empty() && !text.ends_with(['\r', '\n']) {
            text.push_str(NEWLINE);
        }
        text.push_str(line);
        text.push_str(NEWLINE);
        self.commit(text);
    }

    /// Adds an empty section at the end of the document.
    ///
    /// An empty line is written before the header.
    pub fn add_section(&mut self, section_name: &str) {
        self.append_line("");
        self.append_line(&format!("[{}]", section_name));
    }

    /// Appends a line after the last non-blank line of a section.
    ///
    /// When the section occurs several times, its last occurrence is used.
    /// The section is added first if it does not exist.
    pub fn append_line_to_section(&mut self, section_name: &str, line: &str) -> Result<()> {
        let Some(header_index) = physical_lines(&self.text)
            .map(|(l, _)| l)
            .enumerate()
            .filter(|(_, l)| is_header_of(l, section_name))
            .map(|(index, _)| index)
            .last()
        else {
            debug!(section = section_name, "Section not found, adding it");
            self.add_section(section_name);
            self.append_line(line);
            return Ok(());
        };

        let mut insert_index = header_index + 1;
        for (index, (l, _)) in physical_lines(&self.text).enumerate().skip(header_index + 1) {
            if is_section_header(l) {
                break;
            }
            if !is_blank(l) {
                insert_index = index + 1;
            }
        }
        self.insert_line(insert_index, line)
    }

    /// Inserts a line before the line at `line_index`.
    ///
    /// An index equal to the line count appends at the end.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the index is past the end.
    pub fn insert_line(&mut self, line_index: usize, line: &str) -> Result<()> {
        let lines: Vec<_> = physical_lines(&self.text).collect();
        if line_index > lines.len() {
            return Err(line_out_of_range(line_index, lines.len()));
        }

        let mut text = String::with_capacity(self.text.len() + line.len() + NEWLINE.len() * 2);
        for (index, (content, ending)) in lines.iter().enumerate() {
            if index == line_index {
                text.push_str(line);
                text.push_str(NEWLINE);
            }
            text.push_str(content);
            text.push_str(ending);
        }
        if line_index == lines.len() {
            if !text.is_empty() && !text.ends_with(['\r', '\n']) {
                text.push_str(NEWLINE);
            }
            text.push_str(line);
            text.push_str(NEWLINE);
        }
        self.commit(text);
        Ok(())
    }

    /// Replaces the line at `line_index`.
    ///
    /// With `remove_trailing_broken_lines`, the continuation lines of a
    /// broken line are removed together with it. The replacement keeps the
    /// original line's terminator. `None` deletes the line.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the index is past the end.
    pub fn update_line(
        &mut self,
        line_index: usize,
        updated_line: Option<&str>,
        remove_trailing_broken_lines: bool,
    ) -> Result<()> {
        let mut text = String::with_capacity(self.text.len());
        let mut lines = physical_lines(&self.text).enumerate();
        let mut found = false;
        while let Some((index, (content, ending))) = lines.next() {
            if index != line_index {
                text.push_str(content);
                text.push_str(ending);
                continue;
            }

            found = true;
            if let Some(updated) = updated_line {
                text.push_str(updated);
                text.push_str(ending);
            }
            if remove_trailing_broken_lines {
                let mut current = content;
                while is_broken_line(current) {
                    match lines.next() {
                        Some((_, (next, _))) => current = next,
                        None => break,
                    }
                }
            }
        }

        if !found {
            return Err(line_out_of_range(line_index, self.line_count()));
        }
        self.commit(text);
        Ok(())
    }

    /// Deletes the line at `line_index` and its continuation lines.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the index is past the end.
    pub fn delete_line(&mut self, line_index: usize) -> Result<()> {
        self.update_line(line_index, None, true)
    }

    pub(crate) fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Replaces the text and invalidates every cache.
    fn commit(&mut self, text: String) {
        self.text = text;
        self.modified = true;
        *self.section_names.borrow_mut() = None;
        self.section_cache.borrow_mut().clear();
    }
}

fn line_out_of_range(line_index: usize, line_count: usize) -> InfError {
    InfError::malformed(format!(
        "line index {} out of range (document has {} lines)",
        line_index, line_count
    ))
}
