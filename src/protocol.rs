//! Serializable views of roster state (serde ready).
//! Used by the JSON roster format; keeps internal types free of output concerns.

use serde::Serialize;

use crate::domain::{Category, ExamPaper, Student, TestItem};
use crate::pinyin::romanize_name;

#[derive(Debug, Serialize)]
pub struct StudentOut {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub romanized: Option<String>,
    pub paper: Option<PaperOut>,
}

#[derive(Debug, Serialize)]
pub struct PaperOut {
    pub items: Vec<ItemOut>,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct ItemOut {
    pub code: String,
    pub category: Category,
    pub title: String,
    pub score: f64,
}

pub fn to_out(s: &Student) -> StudentOut {
    StudentOut {
        id: s.id().to_string(),
        name: s.name().to_string(),
        romanized: romanize_name(s.name()),
        paper: s.paper().map(paper_out),
    }
}

fn paper_out(p: &ExamPaper) -> PaperOut {
    PaperOut {
        items: p.iter().map(item_out).collect(),
        total: p.total_score(),
    }
}

fn item_out(i: &TestItem) -> ItemOut {
    let t = i.test();
    ItemOut {
        code: t.code.clone(),
        category: t.category(),
        title: t.title.clone(),
        score: i.score(),
    }
}
