/*!
 * Word document generation for translation results.
 *
 * Layout: a centered title, the English original, the Chinese translation,
 * a glossary table when terms are present, and a centered footer on every page.
 */

use docx_rs::{
    AlignmentType, Docx, Footer, Paragraph, Run, RunFonts, Style, StyleType, Table, TableCell,
    TableRow,
};
use log::{error, info};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::errors::RenderError;
use crate::file_utils::FileManager;
use crate::translation::GlossaryTerm;

const FONT: &str = "Microsoft YaHei";

// Sizes are in half-points
const BODY_SIZE: usize = 24;
const TITLE_SIZE: usize = 36;
const HEADING_SIZE: usize = 32;

const TITLE: &str = "翻译结果文档";
const ORIGINAL_HEADING: &str = "一、英文原文";
const TRANSLATION_HEADING: &str = "二、中文翻译";
const GLOSSARY_HEADING: &str = "三、专业词汇表";
const GLOSSARY_COLUMNS: [&str; 3] = ["英文术语", "中文翻译", "术语解释"];

/// A document written to the download directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// File name inside the download directory
    pub file_name: String,
    /// Full path of the file
    pub path: PathBuf,
}

impl RenderedDocument {
    /// URL path under which the document is served
    pub fn url(&self) -> String {
        FileManager::download_url(&self.file_name)
    }
}

/// Renders translation results as `.docx` files
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    output_dir: PathBuf,
    footer_text: String,
}

impl DocumentRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, footer_text: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            footer_text: footer_text.into(),
        }
    }

    /// Directory documents are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render the document into memory
    pub fn render(
        &self,
        original_text: &str,
        translated_text: &str,
        glossary: &[GlossaryTerm],
    ) -> Result<Vec<u8>, RenderError> {
        let mut docx = Docx::new()
            .default_fonts(fonts())
            .default_size(BODY_SIZE)
            .add_style(heading_style("Title", "Title", TITLE_SIZE))
            .add_style(heading_style("Heading1", "Heading 1", HEADING_SIZE))
            .add_paragraph(
                Paragraph::new()
                    .style("Title")
                    .align(AlignmentType::Center)
                    .add_run(Run::new().add_text(TITLE)),
            )
            .add_paragraph(heading(ORIGINAL_HEADING));

        for paragraph in text_paragraphs(original_text) {
            docx = docx.add_paragraph(paragraph);
        }

        docx = docx.add_paragraph(heading(TRANSLATION_HEADING));
        for paragraph in text_paragraphs(translated_text) {
            docx = docx.add_paragraph(paragraph);
        }

        if !glossary.is_empty() {
            docx = docx
                .add_paragraph(heading(GLOSSARY_HEADING))
                .add_table(glossary_table(glossary))
                .add_paragraph(Paragraph::new());
        }

        let footer = Footer::new().add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(&self.footer_text)),
        );
        docx = docx.footer(footer);

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| RenderError::Build(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    /// Render the document and store it in the output directory
    pub async fn render_to_file(
        &self,
        original_text: &str,
        translated_text: &str,
        glossary: &[GlossaryTerm],
    ) -> Result<RenderedDocument, RenderError> {
        let bytes = self.render(original_text, translated_text, glossary)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let file_name = FileManager::document_file_name(&FileManager::short_id());
        let path = self.output_dir.join(&file_name);

        if let Err(e) = tokio::fs::write(&path, bytes).await {
            error!("Failed to write document {:?}: {}", path, e);
            return Err(e.into());
        }

        info!("Word document generated: {}", file_name);
        Ok(RenderedDocument { file_name, path })
    }
}

fn fonts() -> RunFonts {
    RunFonts::new().ascii(FONT).hi_ansi(FONT).east_asia(FONT)
}

fn heading_style(id: &str, name: &str, size: usize) -> Style {
    Style::new(id, StyleType::Paragraph)
        .name(name)
        .size(size)
        .bold()
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new()
        .style("Heading1")
        .add_run(Run::new().add_text(text))
}

// One paragraph per line; docx text runs do not honour '\n'.
fn text_paragraphs(text: &str) -> Vec<Paragraph> {
    text.lines()
        .map(|line| Paragraph::new().add_run(Run::new().add_text(line)))
        .collect()
}

fn glossary_table(glossary: &[GlossaryTerm]) -> Table {
    let header = TableRow::new(
        GLOSSARY_COLUMNS
            .iter()
            .map(|title| {
                TableCell::new().add_paragraph(
                    Paragraph::new()
                        .align(AlignmentType::Center)
                        .add_run(Run::new().add_text(*title).bold()),
                )
            })
            .collect(),
    );

    let mut rows = vec![header];
    rows.extend(glossary.iter().map(|term| {
        TableRow::new(
            [&term.term, &term.translation, &term.explanation]
                .into_iter()
                .map(|value| {
                    TableCell::new()
                        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(value)))
                })
                .collect(),
        )
    }));

    Table::new(rows)
}
