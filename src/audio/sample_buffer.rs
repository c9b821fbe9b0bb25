use std::path::Path;
use super::frame::StereoFrame;

#[derive(Clone, Debug)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>, // the decoded audio, always stereo
}

// What the WAV header told us before we flattened it to stereo f32
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl SampleBuffer {
    #[cfg(test)]
    pub fn from_frames(data: Vec<StereoFrame>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    // Load a WAV file from disk at its native rate. The player node handles any
    // mismatch against the device rate, so nothing is resampled here.
    pub fn load_wav(path: &Path) -> Result<(Self, WavFormat), hound::Error> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader // float, just pass it through
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => { // int, scale to [-1, 1]
                let max = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let data: Vec<StereoFrame> = if channels == 1 {
            samples.into_iter().map(StereoFrame::mono).collect() // mono, duplicate
        } else {
            // anything wider than stereo keeps its first two channels
            samples
                .chunks_exact(channels)
                .map(|c| StereoFrame { left: c[0], right: c[1] })
                .collect()
        };

        let format = WavFormat {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        };
        Ok((Self { data }, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_wav(name: &str, spec: hound::WavSpec, samples: &[i16]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pitchperfect-{}-{}.wav", name, std::process::id()));
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn mono_int_wav_is_duplicated_and_scaled() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let path = temp_wav("mono", spec, &[0, 16384, -32768]);
        let (buf, format) = SampleBuffer::load_wav(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(format, WavFormat { sample_rate: 22050, channels: 1 });
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.data[1].left, 0.5);
        assert_eq!(buf.data[1].right, 0.5);
        assert_eq!(buf.data[2].left, -1.0);
    }

    #[test]
    fn stereo_wav_keeps_channels_apart() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let path = temp_wav("stereo", spec, &[16384, -16384, 0, 8192]);
        let (buf, format) = SampleBuffer::load_wav(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(format.channels, 2);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.data[0], StereoFrame { left: 0.5, right: -0.5 });
        assert_eq!(buf.data[1].right, 0.25);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("pitchperfect-definitely-not-here.wav");
        assert!(SampleBuffer::load_wav(&path).is_err());
    }
}
