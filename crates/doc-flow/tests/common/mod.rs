// Flujo mínimo compartido por los tests de integración del motor.
#![allow(dead_code)]
use doc_flow::rules::{AuthorIsNotAVerifier, ChangeVerifier, ContentPresentPredicate, PositiveVerifier};
use doc_flow::{StateBuilder, StateConfig, StateGraph};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Doc {
  Draft,
  Proposed,
  Verified,
  Published,
}

impl fmt::Display for Doc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Doc::Draft => "DRAFT",
      Doc::Proposed => "PROPOSED",
      Doc::Verified => "VERIFIED",
      Doc::Published => "PUBLISHED",
    };
    f.write_str(s)
  }
}

impl FromStr for Doc {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "DRAFT" => Ok(Doc::Draft),
      "PROPOSED" => Ok(Doc::Proposed),
      "VERIFIED" => Ok(Doc::Verified),
      "PUBLISHED" => Ok(Doc::Published),
      other => Err(other.to_string()),
    }
  }
}

/// DRAFT --PUBLISH--> PUBLISHED, DRAFT --PROPOSE--> PROPOSED --VERIFY--> VERIFIED.
pub struct TestConfig {
  graph: Arc<StateGraph<Doc>>,
}

impl TestConfig {
  pub fn new() -> Self {
    let mut b = StateBuilder::new(Doc::Draft);
    b.state(Doc::Draft).editable();
    b.state(Doc::Proposed);
    b.state(Doc::Verified).editable().after_content_change(Doc::Draft);
    b.state(Doc::Published);
    b.rule(Doc::Draft, "PUBLISH", Doc::Published).check(PositiveVerifier);
    b.rule(Doc::Draft, "PROPOSE", Doc::Proposed).content(ContentPresentPredicate);
    b.rule(Doc::Proposed, "VERIFY", Doc::Verified)
     .check(AuthorIsNotAVerifier::default())
     .action(ChangeVerifier::default());
    Self { graph: b.build().expect("test graph") }
  }
}

impl StateConfig for TestConfig {
  type Descriptor = Doc;

  fn graph(&self) -> &Arc<StateGraph<Doc>> {
    &self.graph
  }
}
