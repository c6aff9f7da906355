//! Interactive menu. Reads from any `BufRead`, writes results to `out` and
//! prompts/errors to `err`, so it runs the same on a terminal or in tests.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::RetestError;
use crate::format::Format;
use crate::logic::{item_scores, paper_len, paper_listing, record_score, total_score};
use crate::state::AppState;
use crate::util::{is_valid_student_id, is_valid_student_name, strip_spaces};

const MENU: &str = "\
[0]  Quit
[1]  Display students
[2]  Change display format
[3]  Add student
[4]  Generate exam paper
[5]  Display exam paper
[6]  Enter scores
[7]  Look up item scores
[8]  Look up total score
choice> ";

const LAST_CHOICE: usize = 8;

pub struct Console<R, W, E> {
    input: R,
    out: W,
    err: E,
}

impl<R: BufRead, W: Write, E: Write> Console<R, W, E> {
    pub fn new(input: R, out: W, err: E) -> Self {
        Self { input, out, err }
    }

    /// Runs until the user picks 0 or input ends.
    pub fn run(&mut self, state: &mut AppState) -> io::Result<()> {
        while let Some(choice) = self.read_choice()? {
            debug!(target: "retest", choice, "Menu choice");
            let done = match choice {
                0 => return Ok(()),
                1 => {
                    writeln!(self.out, "{}", state.format.render(&state.catalog))?;
                    true
                }
                2 => self.change_format(state)?,
                3 => self.add_student(state)?,
                4 => self.generate(state)?,
                5 => self.display_paper(state)?,
                6 => self.enter_scores(state)?,
                7 => self.lookup_items(state)?,
                8 => self.lookup_total(state)?,
                _ => unreachable!("choice range checked in read_choice"),
            };
            if !done {
                break;
            }
            self.out.flush()?;
        }
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.err, "{text}")?;
        self.err.flush()?;
        self.read_line()
    }

    fn report(&mut self, e: &RetestError) -> io::Result<()> {
        writeln!(self.err, "{e}")
    }

    fn read_choice(&mut self) -> io::Result<Option<usize>> {
        loop {
            writeln!(self.err)?;
            let Some(line) = self.prompt(MENU)? else { return Ok(None) };
            match line.trim().parse::<usize>() {
                Ok(n) if n <= LAST_CHOICE => return Ok(Some(n)),
                _ => writeln!(self.err, "Invalid choice: {line}")?,
            }
        }
    }

    fn read_id(&mut self) -> io::Result<Option<String>> {
        loop {
            let Some(line) = self.prompt("Student id> ")? else { return Ok(None) };
            let id = strip_spaces(&line);
            if is_valid_student_id(&id) {
                return Ok(Some(id));
            }
            writeln!(self.err, "Illegal input! Please check your input and input again!")?;
        }
    }

    fn read_name(&mut self) -> io::Result<Option<String>> {
        loop {
            let Some(line) = self.prompt("Student name> ")? else { return Ok(None) };
            let name = strip_spaces(&line);
            if is_valid_student_name(&name) {
                return Ok(Some(name));
            }
            writeln!(self.err, "Illegal input! Please check your input and input again!")?;
        }
    }

    // Each action returns Ok(false) when input ran out mid-dialogue.

    fn change_format(&mut self, state: &mut AppState) -> io::Result<bool> {
        let names: Vec<_> = Format::ALL.iter().map(|f| f.name()).collect();
        let Some(line) = self.prompt(&format!("Format ({})> ", names.join("/")))? else { return Ok(false) };
        match line.parse::<Format>() {
            Ok(f) => {
                state.format = f;
                writeln!(self.out, "{}", f.render(&state.catalog))?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn add_student(&mut self, state: &mut AppState) -> io::Result<bool> {
        let id = loop {
            let Some(id) = self.read_id()? else { return Ok(false) };
            match state.catalog.get(&id) {
                Some(existing) => {
                    let e = RetestError::DuplicateId { id: id.clone(), name: existing.name().to_string() };
                    self.report(&e)?;
                }
                None => break id,
            }
        };
        let Some(name) = self.read_name()? else { return Ok(false) };
        match state.add_student(&id, &name) {
            Ok(()) => writeln!(self.out, "Successfully added a student into the system!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn generate(&mut self, state: &mut AppState) -> io::Result<bool> {
        let Some(id) = self.read_id()? else { return Ok(false) };
        match state.generate_for(&id) {
            Ok(()) => writeln!(self.out, "Exam paper generated for student {id}.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn display_paper(&mut self, state: &mut AppState) -> io::Result<bool> {
        let Some(id) = self.read_id()? else { return Ok(false) };
        match paper_listing(state, &id) {
            Ok(lines) => {
                for line in lines {
                    writeln!(self.out, "{line}")?;
                }
            }
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn enter_scores(&mut self, state: &mut AppState) -> io::Result<bool> {
        let Some(id) = self.read_id()? else { return Ok(false) };
        let len = match paper_len(state, &id) {
            Ok(len) => len,
            Err(e) => {
                self.report(&e)?;
                return Ok(true);
            }
        };
        let mut index = 0;
        while index < len {
            let Some(raw) = self.prompt(&format!("The score of item {} is: ", index + 1))? else {
                return Ok(false);
            };
            match record_score(state, &id, index, &raw) {
                Ok(_) => index += 1,
                Err(e @ RetestError::InvalidScore { .. }) => self.report(&e)?,
                Err(e) => {
                    self.report(&e)?;
                    return Ok(true);
                }
            }
        }
        writeln!(self.out, "Record the score successfully!")?;
        Ok(true)
    }

    fn lookup_items(&mut self, state: &mut AppState) -> io::Result<bool> {
        let Some(id) = self.read_id()? else { return Ok(false) };
        match item_scores(state, &id) {
            Ok(scores) => {
                for (i, score) in scores.iter().enumerate() {
                    writeln!(self.out, "The score of item {} is: {}", i + 1, score)?;
                }
            }
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }

    fn lookup_total(&mut self, state: &mut AppState) -> io::Result<bool> {
        let Some(id) = self.read_id()? else { return Ok(false) };
        match total_score(state, &id) {
            Ok(total) => writeln!(self.out, "The total score of the student is: {total}")?,
            Err(e) => self.report(&e)?,
        }
        Ok(true)
    }
}
