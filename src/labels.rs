// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Catalogue of the recognized status labels and the fixed transitions reported on
// role: model/catalogue
// outputs: StatusLabel, TransitionSpec, LABEL_TRANSITIONS
// invariants:
// - Tracker names are matched bit-exact (scoped `status::` labels)
// - LABEL_TRANSITIONS order defines the report's column order
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StatusLabel {
  Doing,
  Review,
  ReadyForQa,
  WaitingForProd,
  Released,
}

impl StatusLabel {
  pub const ALL: [StatusLabel; 5] = [
    StatusLabel::Doing,
    StatusLabel::Review,
    StatusLabel::ReadyForQa,
    StatusLabel::WaitingForProd,
    StatusLabel::Released,
  ];

  /// Label name as stored by the tracker.
  pub fn name(self) -> &'static str {
    match self {
      StatusLabel::Doing => "status::Doing",
      StatusLabel::Review => "status::Review",
      StatusLabel::ReadyForQa => "status::Ready for Final QA",
      StatusLabel::WaitingForProd => "status::Waiting for PROD",
      StatusLabel::Released => "status::Released",
    }
  }

  /// Short name used in report headers.
  pub fn display_name(self) -> &'static str {
    match self {
      StatusLabel::Doing => "Doing",
      StatusLabel::Review => "Review",
      StatusLabel::ReadyForQa => "QA",
      StatusLabel::WaitingForProd => "Waiting for Prod",
      StatusLabel::Released => "Released",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|label| label.name() == name)
  }
}

/// A (starting_label, final_label) pair whose entry/exit times are reported.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TransitionSpec {
  pub starting: StatusLabel,
  pub final_label: StatusLabel,
}

impl TransitionSpec {
  pub const fn new(starting: StatusLabel, final_label: StatusLabel) -> Self {
    Self { starting, final_label }
  }
}

pub const LABEL_TRANSITIONS: [TransitionSpec; 5] = [
  // Small steps
  TransitionSpec::new(StatusLabel::Doing, StatusLabel::Review),
  TransitionSpec::new(StatusLabel::Review, StatusLabel::ReadyForQa),
  TransitionSpec::new(StatusLabel::ReadyForQa, StatusLabel::WaitingForProd),
  TransitionSpec::new(StatusLabel::WaitingForProd, StatusLabel::Released),
  // Overall flow
  TransitionSpec::new(StatusLabel::Doing, StatusLabel::Released),
];
