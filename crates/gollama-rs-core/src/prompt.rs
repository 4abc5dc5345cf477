//! Line-oriented terminal prompting.

use crate::CoreError;
use gollama_rs_config::{MAX_TEMPERATURE, MIN_TEMPERATURE, temperature_in_range};
use std::fmt::Display;
use std::io::{BufRead, Write};

const TEMPERATURE_GUIDANCE: [&str; 4] = [
    "Temperature settings guide:",
    "0.1 - 0.3: Deterministic, ideal for precise tasks",
    "0.4 - 0.7: Balanced, suitable for conversations",
    "0.8 - 1.0: High randomness, for creative tasks",
];

/// Reads answers from `input` and writes prompts to `output`.
///
/// Every read trims surrounding whitespace and replaces bytes that are not
/// valid UTF-8. End-of-file is reported as `None` by `try_read_line` and as
/// `CoreError::InputClosed` everywhere else.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer used for prompts, for callers that print their own output.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Split back into the underlying reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Write one line of output.
    pub fn say(&mut self, text: impl Display) -> Result<(), CoreError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Print `prompt` and read one line, `None` at end-of-file.
    pub fn try_read_line(&mut self, prompt: &str) -> Result<Option<String>, CoreError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    /// Print `prompt` and read one line.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, CoreError> {
        self.try_read_line(prompt)?.ok_or(CoreError::InputClosed)
    }

    /// Read a line, substituting `default` when the answer is blank.
    pub fn read_with_default(&mut self, prompt: &str, default: &str) -> Result<String, CoreError> {
        let answer = self.read_line(prompt)?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Print a numbered list of models.
    pub fn list_models(&mut self, models: &[String]) -> Result<(), CoreError> {
        writeln!(self.output, "Available models:")?;
        for (index, model) in models.iter().enumerate() {
            writeln!(self.output, "{}. {model}", index + 1)?;
        }
        Ok(())
    }

    /// Ask for a 1-based index into `models` until a valid one is entered.
    pub fn select_model(&mut self, label: &str, models: &[String]) -> Result<String, CoreError> {
        let prompt = format!("Select {label} Model by entering the corresponding number: ");
        loop {
            let answer = self.read_line(&prompt)?;
            match answer.parse::<usize>() {
                Ok(index) if (1..=models.len()).contains(&index) => {
                    return Ok(models[index - 1].clone());
                }
                _ => self.say(format!(
                    "Invalid choice. Please select a number between 1 and {}.",
                    models.len()
                ))?,
            }
        }
    }

    /// Print what the temperature ranges are good for.
    pub fn temperature_guidance(&mut self) -> Result<(), CoreError> {
        writeln!(self.output, "\n### Temperature Guidance ###")?;
        for line in TEMPERATURE_GUIDANCE {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    /// Ask for a temperature until one inside the accepted range is entered.
    pub fn read_temperature(&mut self) -> Result<f64, CoreError> {
        let prompt = format!(
            "Enter Temperature ({MIN_TEMPERATURE:.1} - {MAX_TEMPERATURE:.1}, e.g., 0.5): "
        );
        loop {
            let answer = self.read_line(&prompt)?;
            match answer.parse::<f64>() {
                Ok(value) if temperature_in_range(value) => return Ok(value),
                _ => self.say(format!(
                    "Invalid input. Please enter a valid number between \
                     {MIN_TEMPERATURE:.1} and {MAX_TEMPERATURE:.1}."
                ))?,
            }
        }
    }

    /// Ask a yes/no question until `y` or `n` is entered.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, CoreError> {
        loop {
            let answer = self.read_line(prompt)?;
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Invalid option. Please type 'y' for yes or 'n' for no.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_parts().1).expect("utf8")
    }

    #[test]
    fn select_model_reprompts_until_valid() {
        let models = vec!["a".to_string(), "b".to_string()];
        let mut prompter = prompter("0\nx\n2\n");
        let chosen = prompter.select_model("Primary", &models).expect("select");
        assert_eq!(chosen, "b");
        let out = transcript(prompter);
        assert_eq!(
            out.matches("Invalid choice. Please select a number between 1 and 2.")
                .count(),
            2
        );
    }

    #[test]
    fn temperature_rejects_out_of_range() {
        let mut prompter = prompter("1.5\n0.05\nwarm\n 0.7 \n");
        assert_eq!(prompter.read_temperature().expect("temperature"), 0.7);
        assert_eq!(transcript(prompter).matches("Invalid input.").count(), 3);
    }

    #[test]
    fn confirm_accepts_either_case() {
        let mut prompter = prompter("maybe\nY\n");
        assert!(prompter.confirm("ok? ").expect("confirm"));
        let mut prompter = self::prompter("N\n");
        assert!(!prompter.confirm("ok? ").expect("confirm"));
    }

    #[test]
    fn eof_is_input_closed() {
        let mut prompter = prompter("");
        assert_eq!(prompter.try_read_line("You: ").expect("read"), None);
        let err = prompter.read_line("You: ").unwrap_err();
        assert!(matches!(err, CoreError::InputClosed));
    }

    #[test]
    fn blank_answer_takes_default() {
        let mut prompter = prompter("\n");
        let url = prompter
            .read_with_default("URL: ", "http://localhost:11434/")
            .expect("read");
        assert_eq!(url, "http://localhost:11434/");
    }

    #[test]
    fn invalid_utf8_is_read_lossily() {
        let mut prompter = Prompter::new(Cursor::new(b"caf\xe9\nnext\n".to_vec()), Vec::new());
        assert_eq!(
            prompter.read_line("You: ").expect("read"),
            "caf\u{FFFD}"
        );
        assert_eq!(prompter.read_line("You: ").expect("read"), "next");
    }
}
