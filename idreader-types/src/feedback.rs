//! User feedback: LED, vibration and sounds

/// Button LED mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedMode {
    On,
    Off,
    Blinking,
}

/// Vibration patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VibrationPattern {
    None,
    WeakSingle,
    WeakTriple,
    WeakQuadruple,
    StrongDouble,
    StrongTriple,
}

/// Speaker sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeakerSound {
    None,
    Notify,
    NotifySubtle,
    Success,
    Failure,
    Alert,
    Connect,
    Disconnect,
    BatteryLow,
}

/// High level feedback kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    Notify,
    NotifySubtle,
    Success,
    Failure,
    Alert,
    Connect,
    Disconnect,
    BatteryLow,
}

impl Feedback {
    /// Vibration and sound played for this feedback
    pub fn pattern(self) -> (VibrationPattern, SpeakerSound) {
        match self {
            Self::Notify => (VibrationPattern::WeakSingle, SpeakerSound::Notify),
            Self::NotifySubtle => (VibrationPattern::WeakSingle, SpeakerSound::NotifySubtle),
            Self::Success => (VibrationPattern::StrongDouble, SpeakerSound::Success),
            Self::Failure => (VibrationPattern::StrongTriple, SpeakerSound::Failure),
            Self::Alert => (VibrationPattern::WeakQuadruple, SpeakerSound::Alert),
            Self::Connect => (VibrationPattern::WeakTriple, SpeakerSound::Connect),
            Self::Disconnect => (VibrationPattern::WeakTriple, SpeakerSound::Disconnect),
            Self::BatteryLow => (VibrationPattern::WeakQuadruple, SpeakerSound::BatteryLow),
        }
    }
}
