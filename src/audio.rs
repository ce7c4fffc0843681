use fundsp::prelude32 as dsp;
use log::{debug, warn};
use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::{self, IsTerminal, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AudioEvent {
    Eat,
    GameOver,
    LevelUp,
    Move,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Track {
    BackgroundMusic,
}

pub(crate) trait Audio {
    /// `volume` is in `[0, 1]`
    fn play(&mut self, event: AudioEvent, volume: f32);
    fn play_loop(&mut self, track: Track);
    fn stop(&mut self, track: Track);
}

#[derive(Debug, Default)]
pub(crate) struct Silent;

impl Audio for Silent {
    fn play(&mut self, _event: AudioEvent, _volume: f32) {}
    fn play_loop(&mut self, _track: Track) {}
    fn stop(&mut self, _track: Track) {}
}

// ── Synthesised sound ───────────────────────────────────────────────────────
const SAMPLE_RATE: u32 = 44_100;
const MUSIC_VOLUME: f32 = 0.3;
const MELODY: [f32; 8] = [330.0, 392.0, 440.0, 392.0, 330.0, 294.0, 262.0, 294.0];
const MELODY_NOTE: f32 = 0.25;

pub(crate) struct Synth {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
}

impl Synth {
    pub(crate) fn init() -> Result<Self, rodio::StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Synth {
            _stream: stream,
            handle,
            music: None,
        })
    }
}

impl Audio for Synth {
    fn play(&mut self, event: AudioEvent, volume: f32) {
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.set_volume(volume);
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, event_samples(event)));
                sink.detach();
            }
            Err(e) => debug!("No sink for {:?}: {}", event, e),
        }
    }

    fn play_loop(&mut self, track: Track) {
        if self.music.is_some() {
            return;
        }
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                debug!("Looping {:?}", track);
                sink.set_volume(MUSIC_VOLUME);
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, track_samples(track)).repeat_infinite());
                self.music = Some(sink);
            }
            Err(e) => warn!("Can't start {:?}: {}", track, e),
        }
    }

    fn stop(&mut self, track: Track) {
        if let Some(sink) = self.music.take() {
            debug!("Stopping {:?}", track);
            sink.stop();
        }
    }
}

fn event_samples(event: AudioEvent) -> Vec<f32> {
    match event {
        AudioEvent::Eat => {
            let duration = 0.1;
            let mut node = dsp::sine_hz(440.0)
                * dsp::lfo(move |t: f32| dsp::xerp(0.4, 0.001, (t / duration).min(1.0)));
            render_mono(&mut node, duration)
        }
        AudioEvent::GameOver => {
            let duration = 0.5;
            let mut node = (dsp::lfo(|t: f32| dsp::lerp(220.0, 80.0, (t / 0.4).min(1.0)))
                >> dsp::saw())
                * dsp::lfo(move |t: f32| dsp::lerp(0.3, 0.0, (t / duration).min(1.0)));
            render_mono(&mut node, duration)
        }
        AudioEvent::LevelUp => notes(&[523.0, 659.0, 784.0], 0.08, 0.15, 0.3),
        AudioEvent::Move => {
            let duration = 0.03;
            let mut node = (dsp::noise() >> dsp::bandpass_hz(1200.0, 0.5) >> dsp::mul(0.1))
                * dsp::lfo(move |t: f32| dsp::xerp(0.3, 0.001, (t / duration).min(1.0)));
            render_mono(&mut node, duration)
        }
    }
}

fn track_samples(track: Track) -> Vec<f32> {
    match track {
        Track::BackgroundMusic => notes(&MELODY, MELODY_NOTE, MELODY_NOTE, 0.2),
    }
}

/// Decaying sine notes starting every `gap` seconds, mixed into one buffer.
fn notes(freqs: &[f32], gap: f32, note_len: f32, peak: f32) -> Vec<f32> {
    let total = gap * (freqs.len() as f32 - 1.0) + note_len;
    let total_samples = (SAMPLE_RATE as f32 * total) as usize;
    let mut samples = vec![0.0f32; total_samples];

    for (idx, freq) in freqs.iter().enumerate() {
        let start = (gap * idx as f32 * SAMPLE_RATE as f32) as usize;
        let mut node = dsp::sine_hz(*freq)
            * dsp::lfo(move |t: f32| dsp::xerp(peak, 0.001, (t / note_len).min(1.0)));
        for (i, s) in render_mono(&mut node, note_len).into_iter().enumerate() {
            if let Some(slot) = samples.get_mut(start + i) {
                *slot += s;
            }
        }
    }
    samples
}

fn render_mono(node: &mut dyn dsp::AudioUnit, duration: f32) -> Vec<f32> {
    node.set_sample_rate(SAMPLE_RATE as f64);
    node.reset();

    let sample_count = (SAMPLE_RATE as f32 * duration) as usize;
    (0..sample_count).map(|_| node.get_mono()).collect()
}

// ── Terminal bell ───────────────────────────────────────────────────────────

/// Rings the terminal bell for loud events. A bell can't play music, so tracks are ignored.
pub(crate) struct Bell<W: Write> {
    out: W,
}

const BELL_THRESHOLD: f32 = 0.5;

impl Bell<io::Stdout> {
    pub(crate) fn init() -> io::Result<Self> {
        let out = io::stdout();
        if !out.is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdout is not a terminal",
            ));
        }
        Ok(Bell { out })
    }
}

impl<W: Write> Audio for Bell<W> {
    fn play(&mut self, event: AudioEvent, volume: f32) {
        if event == AudioEvent::Move || volume < BELL_THRESHOLD {
            return;
        }
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            debug!("Bell failed for {:?}: {}", event, e);
        }
    }

    fn play_loop(&mut self, _track: Track) {}

    fn stop(&mut self, _track: Track) {}
}

/// Synthesised sound, then the bell, then silence.
pub(crate) fn open() -> Box<dyn Audio> {
    match Synth::init() {
        Ok(synth) => return Box::new(synth),
        Err(e) => warn!("No audio output, trying the terminal bell: {}", e),
    }
    match Bell::init() {
        Ok(bell) => Box::new(bell),
        Err(e) => {
            warn!("Audio unavailable, continuing silently: {}", e);
            Box::new(Silent)
        }
    }
}
