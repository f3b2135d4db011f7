//! The generate-sound flow: a creature vocalization as WAV audio.
//!
//! The speech model returns raw 16-bit PCM at 24 kHz mono; the flow
//! wraps it in a RIFF/WAV container and hands back a data URI that any
//! audio element can play.

use super::{Chronicler, FlowError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use gemini::{Request, TTS_MODEL};

/// Prebuilt voice used for creature vocalizations.
const SOUND_VOICE: &str = "Algenib";

/// PCM parameters the speech model emits.
const CHANNELS: u16 = 1;
const SAMPLE_RATE: u32 = 24_000;
const BITS_PER_SAMPLE: u16 = 16;

impl Chronicler {
    /// Generate creature-vocalization audio from a text description.
    ///
    /// Returns a `data:audio/wav;base64,...` URI.
    pub async fn generate_sound(&self, description: &str) -> Result<String, FlowError> {
        let prompt = format!(
            "Generate a sound that matches the following description. Do not include any \
             spoken words, only the sound itself. The description is: \"{description}\""
        );

        let request = Request::from_prompt(prompt)
            .with_model(TTS_MODEL)
            .with_audio_output(SOUND_VOICE);

        let response = self.client().generate(request).await?;
        let (_, data) = response.inline_data().ok_or(FlowError::Empty)?;

        let pcm = BASE64
            .decode(data)
            .map_err(|e| FlowError::Invalid(e.to_string()))?;
        let wav = pcm_to_wav(&pcm, CHANNELS, SAMPLE_RATE, BITS_PER_SAMPLE);

        Ok(format!("data:audio/wav;base64,{}", BASE64.encode(wav)))
    }
}

/// Wrap raw PCM samples in a canonical 44-byte RIFF/WAV header.
pub fn pcm_to_wav(pcm: &[u8], channels: u16, sample_rate: u32, bits_per_sample: u16) -> Vec<u8> {
    let block_align = channels * bits_per_sample / 8;
    let byte_rate = sample_rate * block_align as u32;
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_header_layout() {
        let pcm = vec![0u8; 480];
        let wav = pcm_to_wav(&pcm, 1, 24_000, 16);

        assert_eq!(wav.len(), 44 + 480);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");

        // Chunk sizes
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 36 + 480);
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 480);
    }

    #[test]
    fn test_wav_format_fields() {
        let wav = pcm_to_wav(&[0u8; 4], 1, 24_000, 16);

        // audio format = 1 (PCM), channels = 1
        assert_eq!(u16::from_le_bytes(wav[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        // sample rate and derived byte rate / block align
        assert_eq!(
            u32::from_le_bytes(wav[24..28].try_into().unwrap()),
            24_000
        );
        assert_eq!(
            u32::from_le_bytes(wav[28..32].try_into().unwrap()),
            24_000 * 2
        );
        assert_eq!(u16::from_le_bytes(wav[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(wav[34..36].try_into().unwrap()), 16);
    }

    #[test]
    fn test_wav_preserves_samples() {
        let pcm: Vec<u8> = (0..=255).collect();
        let wav = pcm_to_wav(&pcm, 1, 24_000, 16);
        assert_eq!(&wav[44..], &pcm[..]);
    }
}
