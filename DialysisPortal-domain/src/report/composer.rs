use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::entities::{AggregatedStatistics, NormalizedSessionView, ReportData, SessionStatus};
use crate::services::normalizer::{format_optional, NOT_AVAILABLE};

use super::layout::{
    wrap_text, Block, FinishedReport, FontWeight, LayoutState, ReportDocument, Rgb, CONTENT_WIDTH_MM,
    MARGIN_MM,
};

pub const HEADER_HEIGHT_MM: f32 = 30.0;
pub const PATIENT_BLOCK_HEIGHT_MM: f32 = 30.0;
pub const STATISTICS_PANEL_HEIGHT_MM: f32 = 44.0;
pub const SECTION_TITLE_HEIGHT_MM: f32 = 10.0;
pub const MEDICATION_LINE_HEIGHT_MM: f32 = 6.0;
pub const SESSION_ENTRY_HEIGHT_MM: f32 = 24.0;
pub const SYMPTOM_LINE_HEIGHT_MM: f32 = 4.5;
pub const OBSERVATION_LINE_HEIGHT_MM: f32 = 3.5;
pub const EMPTY_STATE_HEIGHT_MM: f32 = 12.0;

/// Characters per symptom line at the 8pt body size
const SYMPTOM_WRAP_CHARS: usize = 105;

/// Wrapped symptom lines per block; longer text continues in further blocks
const MAX_SYMPTOM_LINES: usize = 12;

/// Wrapped observation lines kept inside a session box, notice included
const MAX_OBSERVATION_LINES: usize = 8;

pub const TRUNCATION_NOTICE: &str = "[texto truncado - consulte o registro completo no portal]";

pub const REPORT_TITLE: &str = "Relatório de Diálise Peritoneal";

const BRAND: Rgb = Rgb::new(14, 116, 144);
const NORMAL: Rgb = Rgb::new(22, 163, 74);
const ATTENTION: Rgb = Rgb::new(220, 38, 38);
const PANEL_FILL: Rgb = Rgb::new(240, 249, 255);

/// Sections of the report in drawing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSection {
    Header,
    PatientInfo,
    Statistics,
    Medications,
    SessionList,
    FooterPass,
}

impl ReportSection {
    /// Section following this one; the medications section is skipped when
    /// there is nothing prescribed
    pub fn next(self, data: &ReportData) -> Option<ReportSection> {
        match self {
            ReportSection::Header => Some(ReportSection::PatientInfo),
            ReportSection::PatientInfo => Some(ReportSection::Statistics),
            ReportSection::Statistics if data.medications.is_empty() => Some(ReportSection::SessionList),
            ReportSection::Statistics => Some(ReportSection::Medications),
            ReportSection::Medications => Some(ReportSection::SessionList),
            ReportSection::SessionList => Some(ReportSection::FooterPass),
            ReportSection::FooterPass => None,
        }
    }
}

/// Lays out one patient's report section by section
pub struct ReportComposer<'a> {
    data: &'a ReportData,
    state: LayoutState,
}

impl<'a> ReportComposer<'a> {
    pub fn new(data: &'a ReportData) -> Self {
        Self {
            data,
            state: LayoutState::new(),
        }
    }

    /// Run every content section; stops before the footer pass
    pub fn compose(mut self) -> ReportDocument {
        let mut section = Some(ReportSection::Header);
        while let Some(current) = section {
            if current == ReportSection::FooterPass {
                break;
            }
            self.draw(current);
            section = current.next(self.data);
        }

        debug!(
            "Composed report for patient {} with {} sessions on {} pages",
            self.data.patient.id,
            self.data.sessions.len(),
            self.state.page_count()
        );
        self.state.into_document()
    }

    fn draw(&mut self, section: ReportSection) {
        match section {
            ReportSection::Header => self.draw_header(),
            ReportSection::PatientInfo => self.draw_patient(),
            ReportSection::Statistics => self.draw_statistics(),
            ReportSection::Medications => self.draw_medications(),
            ReportSection::SessionList => self.draw_sessions(),
            ReportSection::FooterPass => {}
        }
    }

    fn draw_header(&mut self) {
        let block = Block::new(HEADER_HEIGHT_MM)
            .rect(MARGIN_MM, 0.0, CONTENT_WIDTH_MM, 24.0, Some(BRAND), None)
            .text(MARGIN_MM + 5.0, 10.0, 16.0, FontWeight::Bold, Rgb::WHITE, REPORT_TITLE)
            .text(
                MARGIN_MM + 5.0,
                18.0,
                10.0,
                FontWeight::Regular,
                Rgb::WHITE,
                format!("Período: {}", self.data.period.display()),
            );
        self.state.place(block);
    }

    fn draw_patient(&mut self) {
        let patient = &self.data.patient;
        let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let block = section_title(Block::new(PATIENT_BLOCK_HEIGHT_MM), "Dados do Paciente")
            .text(MARGIN_MM, 14.0, 10.0, FontWeight::Regular, Rgb::BLACK, format!("Nome: {}", patient.name))
            .text(
                MARGIN_MM,
                19.0,
                10.0,
                FontWeight::Regular,
                Rgb::BLACK,
                format!("E-mail: {}    Telefone: {}", or_na(&patient.email), or_na(&patient.phone)),
            )
            .text(
                MARGIN_MM,
                24.0,
                10.0,
                FontWeight::Regular,
                Rgb::BLACK,
                format!("Data de nascimento: {}", or_na(&patient.birth_date)),
            );
        self.state.place(block);
    }

    fn draw_statistics(&mut self) {
        let rows = statistics_rows(&self.data.statistics);
        let column_width = CONTENT_WIDTH_MM / 2.0;

        let mut block = section_title(Block::new(STATISTICS_PANEL_HEIGHT_MM), "Resumo do Período").rect(
            MARGIN_MM,
            9.0,
            CONTENT_WIDTH_MM,
            32.0,
            Some(PANEL_FILL),
            Some(Rgb::LIGHT_GREY),
        );
        for (index, row) in rows.into_iter().enumerate() {
            let column = (index % 2) as f32;
            let line = (index / 2) as f32;
            block = block.text(
                MARGIN_MM + 4.0 + column * column_width,
                16.0 + line * 7.0,
                9.0,
                FontWeight::Regular,
                Rgb::BLACK,
                row,
            );
        }
        self.state.place(block);
    }

    fn draw_medications(&mut self) {
        self.state
            .place(section_title(Block::new(SECTION_TITLE_HEIGHT_MM), "Medicações em Uso"));

        for medication in &self.data.medications {
            let mut line = format!("- {}", medication.summary_line());
            if let Some(note) = &medication.note {
                line.push_str(&format!(" ({})", note));
            }
            let block = Block::new(MEDICATION_LINE_HEIGHT_MM).text(
                MARGIN_MM + 2.0,
                4.0,
                9.0,
                FontWeight::Regular,
                Rgb::BLACK,
                line,
            );
            self.state.place(block);
        }
        self.state.advance(3.0);
    }

    fn draw_sessions(&mut self) {
        let title = section_title(
            Block::new(SECTION_TITLE_HEIGHT_MM),
            format!("Registros de Diálise ({})", self.data.sessions.len()),
        );
        let first_height = self
            .data
            .sessions
            .first()
            .map_or(EMPTY_STATE_HEIGHT_MM, |session| session_entry(session).height);
        self.state.ensure_space(title.height + first_height);
        self.state.place(title);

        if self.data.sessions.is_empty() {
            let block = Block::new(EMPTY_STATE_HEIGHT_MM).text(
                MARGIN_MM,
                6.0,
                10.0,
                FontWeight::Regular,
                Rgb::GREY,
                "Nenhuma sessão registrada no período selecionado.",
            );
            self.state.place(block);
            return;
        }

        for session in &self.data.sessions {
            self.state.place(session_entry(session));
            for block in symptom_blocks(session) {
                self.state.place(block);
            }
        }
    }
}

fn section_title(block: Block, title: impl Into<String>) -> Block {
    block.text(MARGIN_MM, 6.0, 12.0, FontWeight::Bold, BRAND, title)
}

fn statistics_rows(stats: &AggregatedStatistics) -> Vec<String> {
    let pressure = match (stats.mean_systolic, stats.mean_diastolic) {
        (Some(s), Some(d)) => format!("{:.0}/{:.0} mmHg", s, d),
        (Some(s), None) => format!("{:.0}/{} mmHg", s, NOT_AVAILABLE),
        (None, Some(d)) => format!("{}/{:.0} mmHg", NOT_AVAILABLE, d),
        (None, None) => NOT_AVAILABLE.to_string(),
    };
    let with_unit = |value: Option<f64>, decimals: usize, unit: &str| match value {
        Some(_) => format!("{} {}", format_optional(value, decimals), unit),
        None => NOT_AVAILABLE.to_string(),
    };

    vec![
        format!("Total de sessões: {}", stats.total_records),
        format!("Pressão arterial média: {}", pressure),
        format!("UF média: {}", with_unit(stats.mean_uf_liters, 1, "L")),
        format!("Glicose média: {}", with_unit(stats.mean_glucose, 0, "mg/dL")),
        format!("Tempo de permanência médio: {}", with_unit(stats.mean_dwell_time, 0, "min")),
        format!("Sessões com sintomas: {}", stats.sessions_with_symptoms),
        format!("Sessões que requerem atenção: {}", stats.sessions_needing_attention),
    ]
}

fn session_entry(session: &NormalizedSessionView) -> Block {
    let status_color = match session.status {
        SessionStatus::Normal => NORMAL,
        SessionStatus::Attention => ATTENTION,
    };
    let pressure = match (session.systolic, session.diastolic) {
        (Some(s), Some(d)) => format!("{}/{} mmHg", s, d),
        (Some(s), None) => format!("{}/{} mmHg", s, NOT_AVAILABLE),
        (None, Some(d)) => format!("{}/{} mmHg", NOT_AVAILABLE, d),
        (None, None) => NOT_AVAILABLE.to_string(),
    };
    let when = match &session.time_range {
        Some(range) => format!("{}  {}", session.display_date, range),
        None => session.display_date.clone(),
    };
    let weights = match (session.weight_pre_kg, session.weight_post_kg) {
        (None, None) => NOT_AVAILABLE.to_string(),
        (pre, post) => format!("{} / {} kg", format_optional(pre, 1), format_optional(post, 1)),
    };

    let observations = session.observations.as_deref().map(observation_lines).unwrap_or_default();
    let extra = observations.len().saturating_sub(1) as f32 * OBSERVATION_LINE_HEIGHT_MM;

    let mut block = Block::new(SESSION_ENTRY_HEIGHT_MM + extra)
        .rect(MARGIN_MM, 0.0, CONTENT_WIDTH_MM, 21.0 + extra, None, Some(Rgb::LIGHT_GREY))
        .rect(MARGIN_MM, 0.0, 1.5, 21.0 + extra, Some(status_color), None)
        .text(MARGIN_MM + 4.0, 5.5, 10.0, FontWeight::Bold, Rgb::BLACK, when)
        .text(
            MARGIN_MM + CONTENT_WIDTH_MM - 25.0,
            5.5,
            9.0,
            FontWeight::Bold,
            status_color,
            session.status.label(),
        )
        .text(
            MARGIN_MM + 4.0,
            11.0,
            9.0,
            FontWeight::Regular,
            Rgb::BLACK,
            format!(
                "PA: {}    UF: {}    Glicose: {}",
                pressure,
                if session.uf_liters.is_some() {
                    format!("{} L", session.uf_display)
                } else {
                    session.uf_display.clone()
                },
                match session.glucose_mg_dl {
                    Some(g) => format!("{:.0} mg/dL", g),
                    None => NOT_AVAILABLE.to_string(),
                }
            ),
        )
        .text(
            MARGIN_MM + 4.0,
            16.0,
            9.0,
            FontWeight::Regular,
            Rgb::BLACK,
            format!(
                "Permanência: {}    Dextrose: {}    Peso pré/pós: {}",
                match session.dwell_time_min {
                    Some(t) => format!("{:.0} min", t),
                    None => NOT_AVAILABLE.to_string(),
                },
                match session.dextrose_percent {
                    Some(d) => format!("{}%", d),
                    None => NOT_AVAILABLE.to_string(),
                },
                weights
            ),
        );

    for (index, line) in observations.into_iter().enumerate() {
        block = block.text(
            MARGIN_MM + 4.0,
            20.0 + index as f32 * OBSERVATION_LINE_HEIGHT_MM,
            7.0,
            FontWeight::Regular,
            Rgb::GREY,
            line,
        );
    }
    block
}

/// Wrapped observation text; a shortened text ends with [`TRUNCATION_NOTICE`]
fn observation_lines(observations: &str) -> Vec<String> {
    let text = observations.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = wrap_text(&format!("Obs.: {}", text), SYMPTOM_WRAP_CHARS);
    if lines.len() > MAX_OBSERVATION_LINES {
        lines.truncate(MAX_OBSERVATION_LINES - 1);
        lines.push(TRUNCATION_NOTICE.to_string());
    }
    lines
}

/// Conditional blocks listing the session's symptom text
///
/// Each block holds at most [`MAX_SYMPTOM_LINES`] lines and is placed on its
/// own, so a long text carries over to the next page instead of being cut.
fn symptom_blocks(session: &NormalizedSessionView) -> Vec<Block> {
    let text = match session.symptoms.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return Vec::new(),
    };

    wrap_text(&format!("Sintomas: {}", text), SYMPTOM_WRAP_CHARS)
        .chunks(MAX_SYMPTOM_LINES)
        .map(|chunk| {
            let height = 2.0 + chunk.len() as f32 * SYMPTOM_LINE_HEIGHT_MM;
            chunk
                .iter()
                .enumerate()
                .fold(Block::new(height), |block, (index, line)| {
                    block.text(
                        MARGIN_MM + 4.0,
                        3.5 + index as f32 * SYMPTOM_LINE_HEIGHT_MM,
                        8.0,
                        FontWeight::Regular,
                        ATTENTION,
                        line.as_str(),
                    )
                })
        })
        .collect()
}

/// Lay out and stamp a report in one go
pub fn generate_report(data: &ReportData, generated_at: NaiveDateTime) -> FinishedReport {
    ReportComposer::new(data)
        .compose()
        .finalize(format!("{} - {}", REPORT_TITLE, data.patient.name), generated_at)
}

/// `relatorio_<patient_name>_<YYYY-MM-DD>.pdf`
pub fn report_filename(patient_name: &str, date: NaiveDate) -> String {
    let name = patient_name.split_whitespace().collect::<Vec<_>>().join("_");
    let name = if name.is_empty() { "paciente".to_string() } else { name };
    format!("relatorio_{}_{}.pdf", name, date.format("%Y-%m-%d"))
}
