//! Roster rendering. Each format is a pure function of the catalog, picked by name.

use std::fmt::Write as _;
use std::str::FromStr;

use tracing::error;

use crate::catalog::StudentCatalog;
use crate::domain::Student;
use crate::error::RetestError;
use crate::pinyin::romanize_name;
use crate::protocol::{to_out, StudentOut};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
  #[default]
  Plain,
  Html,
  Xml,
  Json,
}

impl Format {
  pub const ALL: [Format; 4] = [Format::Plain, Format::Html, Format::Xml, Format::Json];

  pub fn name(self) -> &'static str {
    match self {
      Format::Plain => "plain",
      Format::Html => "html",
      Format::Xml => "xml",
      Format::Json => "json",
    }
  }

  pub fn render(self, catalog: &StudentCatalog) -> String {
    match self {
      Format::Plain => plain(catalog),
      Format::Html => html(catalog),
      Format::Xml => xml(catalog),
      Format::Json => json(catalog),
    }
  }
}

impl FromStr for Format {
  type Err = RetestError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_ascii_lowercase();
    Format::ALL
      .into_iter()
      .find(|f| f.name() == wanted || (wanted == "text" && *f == Format::Plain))
      .ok_or_else(|| RetestError::Config(format!("unknown roster format '{s}'")))
  }
}

fn total_text(s: &Student) -> Option<String> {
  s.paper().map(|p| format!("{:.1}", p.total_score()))
}

fn plain(catalog: &StudentCatalog) -> String {
  let mut out = String::new();
  for s in catalog {
    let _ = write!(out, "{}_{}", s.id(), s.name());
    if let Some(r) = romanize_name(s.name()) {
      let _ = write!(out, " ({r})");
    }
    out.push('\n');
  }
  out
}

fn html(catalog: &StudentCatalog) -> String {
  let mut out = String::from("<html>\n  <body>\n    <table border=\"1\">\n");
  out.push_str("      <tr><th>Id</th><th>Name</th><th>Total</th></tr>\n");
  for s in catalog {
    let _ = writeln!(
      out,
      "      <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
      escape_markup(s.id()),
      escape_markup(s.name()),
      total_text(s).unwrap_or_else(|| "-".into()),
    );
  }
  out.push_str("    </table>\n  </body>\n</html>\n");
  out
}

fn xml(catalog: &StudentCatalog) -> String {
  let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<StudentCatalog>\n");
  for s in catalog {
    let _ = write!(out, "  <Student id=\"{}\" name=\"{}\"", escape_markup(s.id()), escape_markup(s.name()));
    if let Some(total) = total_text(s) {
      let _ = write!(out, " total=\"{total}\"");
    }
    out.push_str("/>\n");
  }
  out.push_str("</StudentCatalog>\n");
  out
}

fn json(catalog: &StudentCatalog) -> String {
  let views: Vec<StudentOut> = catalog.iter().map(to_out).collect();
  serde_json::to_string_pretty(&views).unwrap_or_else(|e| {
    error!(target: "retest", error = %e, "Failed to serialize roster");
    "[]".into()
  })
}

fn escape_markup(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&apos;"),
      _ => out.push(c),
    }
  }
  out
}
