//! kira-backed locomotion audio.
//!
//! A looping footstep clip follows the gait: the walking loop region is half a
//! second long and the sprinting one a quarter, so the same clip plays at
//! twice the cadence. Running out of stamina plays a one-shot breath clip.

use std::path::{Path, PathBuf};

use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager, AudioManagerSettings, DefaultBackend, Tween};
use tracing::{debug, warn};

use crate::game::collaborators::{AudioCue, LocomotionAudio};

const WALK_LOOP: f64 = 0.5;
const SPRINT_LOOP: f64 = 0.25;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to start audio backend: {0}")]
    Backend(String),

    #[error("failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("failed to play sound: {0}")]
    Play(String),
}

/// Clip locations for [`KiraLocomotionAudio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAssets {
    pub footstep: PathBuf,
    pub breath: PathBuf,
}

impl Default for AudioAssets {
    fn default() -> Self {
        Self {
            footstep: PathBuf::from("assets/audio/single_step.wav"),
            breath: PathBuf::from("assets/audio/out_of_breath.ogg"),
        }
    }
}

pub struct KiraLocomotionAudio {
    manager: AudioManager<DefaultBackend>,
    footstep_data: StaticSoundData,
    breath_data: StaticSoundData,
    footstep: Option<StaticSoundHandle>,
}

impl KiraLocomotionAudio {
    /// Opens the default output device and loads both clips.
    pub fn new(assets: &AudioAssets) -> Result<Self, AudioError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::Backend(e.to_string()))?;

        Ok(Self {
            manager,
            footstep_data: load(&assets.footstep)?,
            breath_data: load(&assets.breath)?,
            footstep: None,
        })
    }

    fn start_footsteps(&mut self, loop_end: f64) -> Result<(), AudioError> {
        self.stop_footsteps();
        let mut handle = self
            .manager
            .play(self.footstep_data.clone())
            .map_err(|e| AudioError::Play(e.to_string()))?;
        handle.set_loop_region(0.0..loop_end);
        self.footstep = Some(handle);
        Ok(())
    }

    fn stop_footsteps(&mut self) {
        if let Some(mut handle) = self.footstep.take() {
            handle.stop(Tween::default());
        }
    }

    fn try_play(&mut self, cue: AudioCue) -> Result<(), AudioError> {
        match cue {
            AudioCue::StartWalking => self.start_footsteps(WALK_LOOP),
            AudioCue::StartSprinting => self.start_footsteps(SPRINT_LOOP),
            AudioCue::StopMoving => {
                self.stop_footsteps();
                Ok(())
            }
            AudioCue::OutOfBreath => self
                .manager
                .play(self.breath_data.clone())
                .map(|_| ())
                .map_err(|e| AudioError::Play(e.to_string())),
        }
    }
}

impl LocomotionAudio for KiraLocomotionAudio {
    fn play(&mut self, cue: AudioCue) {
        debug!(?cue, "audio cue");
        if let Err(err) = self.try_play(cue) {
            warn!(?cue, "{err}");
        }
    }
}

fn load(path: &Path) -> Result<StaticSoundData, AudioError> {
    StaticSoundData::from_file(path).map_err(|e| AudioError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_clip_is_a_load_error() {
        match load(Path::new("does/not/exist.wav")) {
            Err(AudioError::Load { path, .. }) => {
                assert_eq!(path, Path::new("does/not/exist.wav"))
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("loaded a clip that does not exist"),
        }
    }

    #[test]
    fn test_default_assets_point_into_audio_folder() {
        let assets = AudioAssets::default();
        assert!(assets.footstep.starts_with("assets/audio"));
        assert!(assets.breath.starts_with("assets/audio"));
    }
}
