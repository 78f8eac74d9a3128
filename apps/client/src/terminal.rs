//! Line-based terminal front end for quiz sessions.

use std::io::Write;

use linguacard_core::{
    CompletionView, Deck, ItemStyle, MatchItemView, MatchingView, PromptView, QuizMode, QuizView,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::error::Result;
use crate::session::QuizSession;
use crate::verbs::{QuizQuestion, VerbData};

/// Input that leaves the quiz.
pub const QUIT: &str = "q";

/// Drive `session` from `input` until it completes or the user quits.
///
/// Returns the final result, or `None` if the quiz was left early or never
/// started.
pub async fn run_quiz<R, W>(
    session: &QuizSession,
    input: &mut Lines<R>,
    out: &mut W,
) -> Result<Option<CompletionView>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        match session.view() {
            QuizView::Idle => {
                writeln!(out, "No cards to quiz.")?;
                return Ok(None);
            }
            QuizView::Complete(done) => {
                write!(out, "{}", render_completion(&done))?;
                return Ok(Some(done));
            }
            QuizView::Prompt(prompt) => {
                write!(out, "{}", render_prompt(&prompt))?;
                out.flush()?;
                let Some(line) = read_answer(input).await? else {
                    return Ok(None);
                };
                answer_prompt(session, &prompt, &line, out)?;
            }
            QuizView::Matching(board) => {
                write!(out, "{}", render_matching(&board))?;
                out.flush()?;
                let Some(line) = read_answer(input).await? else {
                    return Ok(None);
                };
                pick_pairs(session, &board, &line, out)?;
            }
        }
        session.settle().await;
    }
}

async fn read_answer<R>(input: &mut Lines<R>) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let line = input.next_line().await?;
    Ok(line
        .map(|line| line.trim().to_string())
        .filter(|line| line != QUIT))
}

fn answer_prompt<W: Write>(
    session: &QuizSession,
    prompt: &PromptView,
    line: &str,
    out: &mut W,
) -> Result<()> {
    let entered = if prompt.mode == QuizMode::MultipleChoice {
        let option = option_for(&prompt.options, line).unwrap_or(line);
        session.select_option(option)
    } else {
        session.submit_typed_answer(line)
    };

    if let Err(err) = entered.and_then(|_| session.check_answer()) {
        writeln!(out, "  ! {err}")?;
        return Ok(());
    }

    if let QuizView::Prompt(PromptView {
        feedback: Some(feedback),
        ..
    }) = session.view()
    {
        if feedback.correct {
            writeln!(out, "  ✓ correct")?;
        } else {
            writeln!(out, "  ✗ the answer was: {}", feedback.answer)?;
        }
    }
    Ok(())
}

/// Option picked by its 1-based number.
fn option_for<'a>(options: &'a [String], line: &str) -> Option<&'a str> {
    let index: usize = line.parse().ok()?;
    options.get(index.checked_sub(1)?).map(String::as_str)
}

fn pick_pairs<W: Write>(
    session: &QuizSession,
    board: &MatchingView,
    line: &str,
    out: &mut W,
) -> Result<()> {
    let before = board.score.correct;
    for token in line.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        let Some(item) = item_for(board, token) else {
            writeln!(out, "  ! no item numbered {token}")?;
            continue;
        };
        if let Err(err) = session.select_match_item(&item.id) {
            writeln!(out, "  ! {err}")?;
        }
    }

    match session.view() {
        QuizView::Matching(after) if after.score.correct > before => {
            writeln!(out, "  ✓ match")?;
        }
        QuizView::Matching(after)
            if after
                .fronts
                .iter()
                .chain(&after.backs)
                .any(|item| item.style == ItemStyle::Wrong) =>
        {
            writeln!(out, "  ✗ not a pair")?;
        }
        _ => {}
    }
    Ok(())
}

/// Board item by its number: fronts first, then backs.
fn item_for<'a>(board: &'a MatchingView, token: &str) -> Option<&'a MatchItemView> {
    let index: usize = token.parse().ok()?;
    board
        .fronts
        .iter()
        .chain(&board.backs)
        .nth(index.checked_sub(1)?)
}

pub fn render_prompt(prompt: &PromptView) -> String {
    let mut text = format!(
        "\n[{}/{}] score {}/{}",
        prompt.position, prompt.of, prompt.score.correct, prompt.score.total
    );
    if let Some(pass) = prompt.pass {
        text.push_str(&format!(" · pass {pass}"));
    }
    text.push_str(&format!("\n  {}\n", prompt.front));
    if let Some(pronunciation) = &prompt.pronunciation {
        text.push_str(&format!("  /{pronunciation}/\n"));
    }
    if let Some(image) = &prompt.image {
        text.push_str(&format!("  [image: {image}]\n"));
    }
    if let Some(hint) = &prompt.hint {
        text.push_str(&format!("  hint: {}\n", hint.join(" · ")));
    }
    for (number, option) in prompt.options.iter().enumerate() {
        text.push_str(&format!("  {}) {}\n", number + 1, option));
    }
    text.push_str("> ");
    text
}

pub fn render_matching(board: &MatchingView) -> String {
    let mut text = format!(
        "\nmatched {}/{} · pick a front and a back\n",
        board.score.correct, board.score.total
    );
    let numbered = board.fronts.iter().chain(&board.backs).zip(1..);
    for (item, number) in numbered {
        if number == board.fronts.len() + 1 {
            text.push_str("  --\n");
        }
        let marker = match item.style {
            ItemStyle::Default => " ",
            ItemStyle::Selected => "*",
            ItemStyle::Matched => "✓",
            ItemStyle::Wrong => "✗",
        };
        text.push_str(&format!("  {marker}{number:>2}. {}\n", item.text));
    }
    text.push_str("> ");
    text
}

pub fn render_completion(done: &CompletionView) -> String {
    let mut text = format!(
        "\nFinished {}: {}/{} correct ({}%)\n",
        done.mode, done.score.correct, done.score.total, done.percent
    );
    if done.passes_exhausted {
        text.push_str("Stopped at the pass limit with cards still missed.\n");
    }
    text
}

pub fn render_decks(decks: &[Deck]) -> String {
    if decks.is_empty() {
        return "No decks found.\n".to_string();
    }
    decks
        .iter()
        .map(|deck| match (deck.total_correct, deck.total_attempts) {
            (Some(correct), Some(attempts)) if attempts > 0 => format!(
                "{:>5}  {}  ({}/{} correct)\n",
                deck.id, deck.name, correct, attempts
            ),
            _ => format!("{:>5}  {}\n", deck.id, deck.name),
        })
        .collect()
}

pub fn render_question(question: &QuizQuestion) -> String {
    format!(
        "{} ({}) · {} {}\n",
        question.verb, question.translation, question.mood, question.tense
    )
}

pub fn render_table(data: &VerbData) -> String {
    let mut text = format!("{} ({})\n", data.verb, data.translation);
    for mood in &data.conjugations {
        text.push_str(&format!("\n{}\n", mood.mood));
        for tense in &mood.tenses {
            text.push_str(&format!("  {}\n", tense.tense));
            for pair in &tense.conjugations {
                text.push_str(&format!("    {:<10} {}\n", pair.person, pair.verb));
            }
        }
    }
    text
}
