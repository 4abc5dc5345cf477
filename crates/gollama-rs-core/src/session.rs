//! Interactive chat session against one or more models.
//!
//! A session alternates between reading a prompt and dispatching it. When more
//! than one model is active, the first prompt is fanned out to all of them and
//! the user picks whether to continue with one model or keep comparing. Errors
//! from a single model are printed and the loop continues; only terminal I/O
//! failures end the session early.
//!
//! Blank input lines are never dispatched; the user is asked again.

use crate::{CoreError, Prompter};
use gollama_rs_client::{ChunkSink, CompletionBackend, GenerateRequest};
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};

const USER_PROMPT: &str = "You: ";
const EXIT_PHRASES: [&str; 2] = ["bye", "exit"];

/// Which models receive the next prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    /// Every later turn goes to this model.
    Single(String),
    /// Every turn fans out to these models in order.
    All(Vec<String>),
}

impl ModelSelection {
    /// Models this selection dispatches to, in order.
    pub fn models(&self) -> &[String] {
        match self {
            ModelSelection::Single(model) => std::slice::from_ref(model),
            ModelSelection::All(models) => models,
        }
    }
}

/// How responses are delivered to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Print chunks as they arrive.
    #[default]
    Stream,
    /// Wait for the whole response and print it once.
    Whole,
}

/// State for one chat invocation.
pub struct ChatSession<B> {
    backend: B,
    selection: ModelSelection,
    models: Vec<String>,
    first_turn: bool,
    mode: ResponseMode,
    temperature: Option<f64>,
}

impl<B: CompletionBackend> ChatSession<B> {
    pub fn new(backend: B, selection: ModelSelection) -> Self {
        let models = selection.models().to_vec();
        Self {
            backend,
            selection,
            models,
            first_turn: true,
            mode: ResponseMode::default(),
            temperature: None,
        }
    }

    pub fn with_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Current selection; `Single` once the user has locked a model.
    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    /// Run the read-dispatch loop until an exit phrase or end-of-input.
    ///
    /// `initial_prompt` is used for the first turn instead of reading one.
    pub async fn run<R, W>(
        &mut self,
        prompter: &mut Prompter<R, W>,
        initial_prompt: Option<String>,
    ) -> Result<(), CoreError>
    where
        R: BufRead,
        W: Write + Send,
    {
        info!(
            "chat session started (models={}, mode={:?})",
            self.models.join(","),
            self.mode
        );
        let mut pending = initial_prompt
            .map(|prompt| prompt.trim().to_string())
            .filter(|prompt| !prompt.is_empty());

        loop {
            let prompt = match pending.take() {
                Some(prompt) => prompt,
                None => match next_prompt(prompter)? {
                    Some(prompt) => prompt,
                    None => {
                        debug!("input closed, ending chat session");
                        writeln!(prompter.output())?;
                        return Ok(());
                    }
                },
            };

            if is_exit_phrase(&prompt) {
                prompter.say("Goodbye!")?;
                return Ok(());
            }

            if self.first_turn && self.models.len() > 1 {
                self.first_turn = false;
                let models = self.models.clone();
                self.fan_out(&models, &prompt, prompter.output()).await?;
                match self.choose_selection(prompter)? {
                    Some(selection) => self.selection = selection,
                    None => return Ok(()),
                }
                continue;
            }
            self.first_turn = false;

            match self.selection.clone() {
                ModelSelection::Single(model) => {
                    let out = prompter.output();
                    write!(out, "Gollama [{model}]: ")?;
                    self.dispatch(&model, &prompt, out).await?;
                }
                ModelSelection::All(models) => {
                    self.fan_out(&models, &prompt, prompter.output()).await?;
                }
            }
        }
    }

    async fn fan_out<W: Write + Send>(
        &self,
        models: &[String],
        prompt: &str,
        out: &mut W,
    ) -> Result<(), CoreError> {
        writeln!(out, "Gollama Responses from All Models:")?;
        for model in models {
            write!(out, "\n[{model}]:\n")?;
            self.dispatch(model, prompt, out).await?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Send `prompt` to one model and print the answer.
    ///
    /// Backend failures are printed and swallowed; only output errors return.
    async fn dispatch<W: Write + Send>(
        &self,
        model: &str,
        prompt: &str,
        out: &mut W,
    ) -> Result<(), CoreError> {
        let request = GenerateRequest::new(model, prompt).with_temperature(self.temperature);
        let result = match self.mode {
            ResponseMode::Whole => match self.backend.generate(&request.streaming(false)).await {
                Ok(response) => {
                    writeln!(out, "{}", response.response)?;
                    Ok(())
                }
                Err(err) => Err(err),
            },
            ResponseMode::Stream => {
                let mut sink = WriterSink::new(out);
                let result = self.backend.generate_stream(&request, &mut sink).await;
                sink.finish()?;
                writeln!(out)?;
                result
            }
        };

        if let Err(err) = result {
            warn!("generation failed (model={model}): {err}");
            writeln!(out, "Error generating response from model {model}: {err}")?;
        }
        out.flush()?;
        Ok(())
    }

    /// Show the continue-with menu after the first fan-out.
    ///
    /// Returns `None` when input closes before an answer.
    fn choose_selection<R, W>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Option<ModelSelection>, CoreError>
    where
        R: BufRead,
        W: Write,
    {
        prompter.say(
            "Do you want to continue with a specific model, or receive responses from all models?",
        )?;
        let mut options = Vec::with_capacity(self.models.len() + 1);
        for (index, model) in self.models.iter().enumerate() {
            prompter.say(format!("[{}] Continue with {model}", index + 1))?;
            options.push((index + 1).to_string());
        }
        prompter.say("[A] Continue with All Models")?;
        options.push("A".to_string());

        let prompt = format!("Choose an option ({}): ", options.join(", "));
        let Some(choice) = prompter.try_read_line(&prompt)? else {
            return Ok(None);
        };
        let selection = parse_choice(&choice, &self.models);
        match &selection {
            Some(ModelSelection::Single(model)) => {
                info!("chat session locked to model {model}");
                Ok(selection)
            }
            Some(all) => Ok(Some(all.clone())),
            None => {
                prompter.say("Invalid choice. Continuing with responses from all models.")?;
                Ok(Some(ModelSelection::All(self.models.clone())))
            }
        }
    }
}

/// Read prompts until a non-blank one arrives, `None` at end-of-input.
fn next_prompt<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Option<String>, CoreError> {
    loop {
        match prompter.try_read_line(USER_PROMPT)? {
            Some(line) if line.is_empty() => continue,
            other => return Ok(other),
        }
    }
}

/// Whether `input` ends the session.
pub fn is_exit_phrase(input: &str) -> bool {
    let input = input.trim();
    EXIT_PHRASES
        .iter()
        .any(|phrase| input.eq_ignore_ascii_case(phrase))
}

/// Interpret an answer to the continue-with menu.
fn parse_choice(choice: &str, models: &[String]) -> Option<ModelSelection> {
    let choice = choice.trim();
    if choice.eq_ignore_ascii_case("a") {
        return Some(ModelSelection::All(models.to_vec()));
    }
    match choice.parse::<usize>() {
        Ok(index) if (1..=models.len()).contains(&index) => {
            Some(ModelSelection::Single(models[index - 1].clone()))
        }
        _ => None,
    }
}

/// Forwards streamed chunks to a writer, keeping the first write error.
struct WriterSink<'a, W> {
    out: &'a mut W,
    error: Option<io::Error>,
}

impl<'a, W: Write> WriterSink<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self { out, error: None }
    }

    fn finish(self) -> io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<W: Write + Send> ChunkSink for WriterSink<'_, W> {
    fn chunk(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        let written = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            self.error = Some(err);
        }
    }
}
