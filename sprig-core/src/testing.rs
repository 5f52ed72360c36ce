//! Scripted stand-ins for the runner and prompter capabilities.
//!
//! [`ScriptedRunner`] records every invocation and answers from rules keyed by
//! tool and argument prefix; unmatched invocations succeed with empty output.
//! [`ScriptedPrompter`] answers prompts from a queue and fails loudly when an
//! unexpected prompt appears.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::io;

use crate::error::{Result, SprigError};
use crate::exec::{CommandOutput, CommandRunner, Invocation, Tool};
use crate::prompts::Prompter;

#[derive(Debug)]
struct Rule {
  tool: Tool,
  prefix: Vec<String>,
  responses: VecDeque<CommandOutput>,
}

impl Rule {
  fn matches(&self, invocation: &Invocation) -> bool {
    self.tool == invocation.tool
      && invocation.args.len() >= self.prefix.len()
      && self.prefix.iter().zip(&invocation.args).all(|(want, got)| want == got)
  }

  /// Queued responses are consumed in order; the last one repeats.
  fn respond(&mut self) -> CommandOutput {
    if self.responses.len() > 1 {
      self.responses.pop_front().unwrap_or_default()
    } else {
      self.responses.front().cloned().unwrap_or_default()
    }
  }
}

/// Runner that never spawns anything.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
  rules: RefCell<Vec<Rule>>,
  missing: HashSet<Tool>,
  calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Answer invocations of `tool` whose arguments start with `prefix`.
  ///
  /// Registering the same prefix again queues another response. When several
  /// rules match, the longest prefix wins.
  pub fn on(self, tool: Tool, prefix: &[&str], output: CommandOutput) -> Self {
    {
      let mut rules = self.rules.borrow_mut();
      let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
      match rules.iter_mut().find(|rule| rule.tool == tool && rule.prefix == prefix) {
        Some(rule) => rule.responses.push_back(output),
        None => rules.push(Rule {
          tool,
          prefix,
          responses: VecDeque::from([output]),
        }),
      }
    }
    self
  }

  /// Pretend `tool` is not installed: spawning it fails with `NotFound`.
  pub fn missing(mut self, tool: Tool) -> Self {
    self.missing.insert(tool);
    self
  }

  /// Every invocation seen so far, in order.
  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.borrow().clone()
  }

  /// Invocations rendered as command lines, e.g. `git push`.
  pub fn command_lines(&self) -> Vec<String> {
    self.calls.borrow().iter().map(Invocation::command_line).collect()
  }

  /// Number of invocations of `tool` whose arguments start with `prefix`.
  pub fn count(&self, tool: Tool, prefix: &[&str]) -> usize {
    self
      .calls
      .borrow()
      .iter()
      .filter(|call| {
        call.tool == tool && call.args.len() >= prefix.len() && prefix.iter().zip(&call.args).all(|(a, b)| a == b)
      })
      .count()
  }
}

impl CommandRunner for ScriptedRunner {
  fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
    self.calls.borrow_mut().push(invocation.clone());

    if self.missing.contains(&invocation.tool) {
      return Err(io::Error::new(io::ErrorKind::NotFound, format!("{} not found", invocation.program)));
    }

    let mut rules = self.rules.borrow_mut();
    let best = rules
      .iter_mut()
      .filter(|rule| rule.matches(invocation))
      .max_by_key(|rule| rule.prefix.len());

    Ok(best.map_or_else(|| CommandOutput::success(""), Rule::respond))
  }
}

/// One scripted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
  Confirm(bool),
  Input(String),
  Select(usize),
}

/// Prompter answering from a queue.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
  answers: RefCell<VecDeque<Answer>>,
  asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_confirm(self, answer: bool) -> Self {
    self.answers.borrow_mut().push_back(Answer::Confirm(answer));
    self
  }

  pub fn with_input(self, answer: &str) -> Self {
    self.answers.borrow_mut().push_back(Answer::Input(answer.to_string()));
    self
  }

  pub fn with_select(self, index: usize) -> Self {
    self.answers.borrow_mut().push_back(Answer::Select(index));
    self
  }

  /// Prompt texts shown so far.
  pub fn asked(&self) -> Vec<String> {
    self.asked.borrow().clone()
  }

  fn next(&self, prompt: &str) -> Result<Answer> {
    self.asked.borrow_mut().push(prompt.to_string());
    self
      .answers
      .borrow_mut()
      .pop_front()
      .ok_or_else(|| SprigError::cancelled(format!("unexpected prompt: {prompt}")))
  }
}

impl Prompter for ScriptedPrompter {
  fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
    match self.next(prompt)? {
      Answer::Confirm(answer) => Ok(answer),
      other => Err(SprigError::cancelled(format!("expected a yes/no answer, got {other:?}"))),
    }
  }

  fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
    match self.next(prompt)? {
      Answer::Input(answer) if answer.trim().is_empty() => Ok(default.unwrap_or_default().to_string()),
      Answer::Input(answer) => Ok(answer),
      other => Err(SprigError::cancelled(format!("expected text input, got {other:?}"))),
    }
  }

  fn select(&self, prompt: &str, items: &[&str], _default: usize) -> Result<usize> {
    match self.next(prompt)? {
      Answer::Select(index) if index < items.len() => Ok(index),
      other => Err(SprigError::cancelled(format!("expected a selection, got {other:?}"))),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;

  fn invocation(tool: Tool, args: &[&str]) -> Invocation {
    Invocation::new(tool, &tool.to_string(), Path::new("."), args.iter().copied())
  }

  #[test]
  fn longest_prefix_wins_and_last_response_repeats() {
    let runner = ScriptedRunner::new()
      .on(Tool::Gh, &["api"], CommandOutput::success("generic"))
      .on(Tool::Gh, &["api", "users/ghost404"], CommandOutput::failure(1, "first"))
      .on(Tool::Gh, &["api", "users/ghost404"], CommandOutput::failure(1, "second"));

    let first = runner.run(&invocation(Tool::Gh, &["api", "users/ghost404"])).unwrap();
    let second = runner.run(&invocation(Tool::Gh, &["api", "users/ghost404"])).unwrap();
    let third = runner.run(&invocation(Tool::Gh, &["api", "users/ghost404"])).unwrap();
    let other = runner.run(&invocation(Tool::Gh, &["api", "users/octocat"])).unwrap();

    assert_eq!(first.stderr, "first");
    assert_eq!(second.stderr, "second");
    assert_eq!(third.stderr, "second");
    assert_eq!(other.stdout, "generic");
    assert_eq!(runner.count(Tool::Gh, &["api", "users/ghost404"]), 3);
  }

  #[test]
  fn unmatched_calls_succeed_and_are_recorded() {
    let runner = ScriptedRunner::new();
    let output = runner.run(&invocation(Tool::Git, &["push"])).unwrap();
    assert!(output.succeeded());
    assert_eq!(runner.command_lines(), vec!["git push"]);
  }

  #[test]
  fn missing_tool_fails_to_spawn() {
    let runner = ScriptedRunner::new().missing(Tool::Gh);
    let err = runner.run(&invocation(Tool::Gh, &["--version"])).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    assert!(runner.run(&invocation(Tool::Git, &["--version"])).is_ok());
  }

  #[test]
  fn prompter_answers_in_order_and_rejects_surprises() {
    let prompter = ScriptedPrompter::new().with_input("").with_confirm(true);
    assert_eq!(prompter.input("Commit message", Some("Initial commit")).unwrap(), "Initial commit");
    assert!(prompter.confirm("Log in?", false).unwrap());
    assert!(prompter.confirm("Again?", false).is_err());
    assert_eq!(prompter.asked().len(), 3);
  }
}
