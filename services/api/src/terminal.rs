use crate::infra::{build_service, parse_count, parse_scores};
use clap::Args;
use rim_orientation::catalog::ProgramCatalog;
use rim_orientation::config::{AppConfig, CatalogConfig};
use rim_orientation::error::AppError;
use rim_orientation::orientation::{
    compute_profile, AnswerWeight, MatchResult, MatchesView, OrientationService, ProfileView,
    ProgramMatcher, QuestionView, ResultSink, ScoreMap, SessionId, SessionStore, SessionView,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct QuizArgs {
    /// Questionnaire CSV (defaults to ORIENTATION_QUESTIONS_CSV)
    #[arg(long)]
    pub(crate) questions: Option<PathBuf>,
    /// Program catalog CSV (defaults to ORIENTATION_PROGRAMS_CSV)
    #[arg(long)]
    pub(crate) programs: Option<PathBuf>,
    /// Append the final profile to this CSV file
    #[arg(long)]
    pub(crate) results: Option<PathBuf>,
    /// Number of suggestions to show
    #[arg(long, value_parser = parse_count)]
    pub(crate) count: Option<usize>,
}

impl QuizArgs {
    fn apply(self, mut catalog: CatalogConfig) -> CatalogConfig {
        if let Some(questions) = self.questions {
            catalog.questions_csv = questions;
        }
        if let Some(programs) = self.programs {
            catalog.programs_csv = programs;
        }
        if self.results.is_some() {
            catalog.results_csv = self.results;
        }
        if let Some(count) = self.count {
            catalog.match_count = count;
        }
        catalog
    }
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Final scores, e.g. R=4,I=3 (unlisted dimensions score zero)
    #[arg(long, value_parser = parse_scores)]
    pub(crate) scores: ScoreMap,
    /// Seed for ordering programs at equal distance
    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,
    /// Number of suggestions to show
    #[arg(long, value_parser = parse_count)]
    pub(crate) count: Option<usize>,
    /// Program catalog CSV (defaults to ORIENTATION_PROGRAMS_CSV)
    #[arg(long)]
    pub(crate) programs: Option<PathBuf>,
}

pub(crate) fn run_quiz_command(args: QuizArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = args.apply(config.catalog);
    let service = build_service(&catalog)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_quiz(&service, stdin.lock(), stdout.lock())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args.programs.unwrap_or(config.catalog.programs_csv);
    let count = args.count.unwrap_or(config.catalog.match_count);
    let programs = ProgramCatalog::from_path(&path)?;

    let profile = compute_profile(&args.scores);
    let matches = ProgramMatcher::new(&programs).matches(&profile, count, args.seed);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Profil RIASEC : {profile}")?;
    render_scores(&mut stdout, &args.scores)?;
    render_matches(&mut stdout, &matches, args.seed)?;
    Ok(())
}

enum QuizInput {
    Answer(AnswerWeight),
    Quit,
    Invalid,
}

fn parse_quiz_input(line: &str) -> QuizInput {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return QuizInput::Quit;
    }
    match line.parse::<u8>().map(AnswerWeight::try_from) {
        Ok(Ok(weight)) => QuizInput::Answer(weight),
        _ => QuizInput::Invalid,
    }
}

/// Drives one respondent through the questionnaire, then offers the
/// suggestion menu. End of input behaves like `q`; the session is closed on
/// the way out.
pub(crate) fn run_quiz<S, P, R, W>(
    service: &OrientationService<S, P>,
    mut input: R,
    mut output: W,
) -> Result<(), AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
    R: BufRead,
    W: Write,
{
    let view = service.start()?;
    let id = view.session_id.clone();

    let outcome = drive_quiz(service, &id, view, &mut input, &mut output);
    let closed = service.close(&id);
    outcome?;
    closed?;
    Ok(())
}

fn drive_quiz<S, P, R, W>(
    service: &OrientationService<S, P>,
    id: &SessionId,
    mut view: SessionView,
    input: &mut R,
    output: &mut W,
) -> Result<(), AppError>
where
    S: SessionStore + 'static,
    P: ResultSink + 'static,
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "Questionnaire d'orientation RIASEC ({} questions)",
        view.progress.total
    )?;
    writeln!(
        output,
        "Répondez 0 = {}, 1 = {}, 2 = {} (q pour quitter).",
        AnswerWeight::NotAtAll.label(),
        AnswerWeight::ALittle.label(),
        AnswerWeight::ALot.label()
    )?;

    'quiz: loop {
        while let Some(question) = view.question.clone() {
            render_question(output, &question)?;
            let Some(line) = read_line(input)? else {
                break 'quiz;
            };
            match parse_quiz_input(&line) {
                QuizInput::Answer(weight) => {
                    let outcome = service.answer(id, weight)?;
                    if let Some(warning) = outcome.persistence_warning {
                        writeln!(output, "Attention : {warning}")?;
                    }
                    view.question = outcome.next_question;
                }
                QuizInput::Quit => break 'quiz,
                QuizInput::Invalid => {
                    writeln!(output, "Réponse invalide, tapez 0, 1 ou 2.")?;
                }
            }
        }

        render_profile(output, &service.profile(id)?)?;
        let mut suggestions = service.matches(id)?;
        loop {
            render_suggestions(output, &suggestions)?;
            writeln!(
                output,
                "[g] autres suggestions  [r] recommencer  [q] quitter"
            )?;
            let Some(line) = read_line(input)? else {
                break 'quiz;
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "g" => suggestions = service.regenerate(id)?,
                "r" => {
                    view = service.reset(id)?;
                    continue 'quiz;
                }
                "q" => break 'quiz,
                _ => writeln!(output, "Choix invalide.")?,
            }
        }
    }

    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn render_question<W: Write>(output: &mut W, question: &QuestionView) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "Question {} / {}", question.number, question.total)?;
    writeln!(output, "{}", question.text)?;
    if let Some(translation) = &question.translation {
        writeln!(output, "{translation}")?;
    }
    write!(output, "> ")?;
    output.flush()
}

fn render_profile<W: Write>(output: &mut W, view: &ProfileView) -> io::Result<()> {
    writeln!(output)?;
    writeln!(
        output,
        "Profil RIASEC : {} ({})",
        view.profile,
        view.labels.join(", ")
    )?;
    render_scores(output, &view.scores)
}

fn render_scores<W: Write>(output: &mut W, scores: &ScoreMap) -> io::Result<()> {
    let line = scores
        .entries()
        .map(|(dimension, points)| format!("{dimension}={points}"))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(output, "Scores : {line}")
}

fn render_suggestions<W: Write>(output: &mut W, view: &MatchesView) -> io::Result<()> {
    render_matches(output, &view.matches, view.seed)
}

fn render_matches<W: Write>(output: &mut W, matches: &[MatchResult], seed: u64) -> io::Result<()> {
    writeln!(output, "Filières suggérées (tirage {seed}) :")?;
    if matches.is_empty() {
        return writeln!(output, "  aucune filière exploitable dans le catalogue");
    }
    for (rank, program) in matches.iter().enumerate() {
        writeln!(
            output,
            "{:>3}. {} | {} | {} | distance {}",
            rank + 1,
            program.name,
            program.institution,
            program.code,
            program.distance
        )?;
    }
    Ok(())
}
