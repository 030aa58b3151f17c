//! The sub-image task: load, select, mask, reduce, write.

use std::fmt;
use std::path::{Path, PathBuf};

use imsubimage::{
    subimage, BoxRegion, DegenerateAxes, Pixel, RegionSpec, SubImage, SubimageOptions,
};

use crate::error::Result;
use crate::maskexpr::MaskExpr;
use crate::sink::ImageSink;
use crate::source::ImageSource;

/// A validated task invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskConfig {
    pub imagename: PathBuf,
    /// No file is written when unset.
    pub outfile: Option<PathBuf>,
    pub region: Option<String>,
    pub bbox: Option<BoxRegion>,
    pub mask: Option<MaskExpr>,
    pub options: SubimageOptions,
    pub overwrite: bool,
    pub verbose: bool,
}

impl TaskConfig {
    pub fn builder(imagename: impl Into<PathBuf>) -> TaskConfigBuilder {
        TaskConfigBuilder::new(imagename)
    }
}

/// Collects task parameters as given, then validates them in [`build`].
///
/// [`build`]: TaskConfigBuilder::build
#[derive(Debug, Clone, Default)]
pub struct TaskConfigBuilder {
    imagename: PathBuf,
    outfile: Option<PathBuf>,
    region: Option<String>,
    bbox: Option<String>,
    mask: Option<String>,
    stretch: bool,
    dropdeg: bool,
    keepaxes: Vec<usize>,
    overwrite: bool,
    verbose: bool,
}

/// Empty strings mean "unset", as in the task's parameter defaults.
fn non_empty(text: impl Into<String>) -> Option<String> {
    let text = text.into();
    (!text.trim().is_empty()).then_some(text)
}

impl TaskConfigBuilder {
    pub fn new(imagename: impl Into<PathBuf>) -> Self {
        TaskConfigBuilder {
            imagename: imagename.into(),
            ..Default::default()
        }
    }

    pub fn outfile(mut self, outfile: impl Into<PathBuf>) -> Self {
        let outfile = outfile.into();
        self.outfile = (!outfile.as_os_str().is_empty()).then_some(outfile);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = non_empty(region);
        self
    }

    /// Inclusive `blcx,blcy,trcx,trcy` corners on the first two axes.
    pub fn bbox(mut self, bbox: impl Into<String>) -> Self {
        self.bbox = non_empty(bbox);
        self
    }

    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = non_empty(mask);
        self
    }

    pub fn stretch(mut self, stretch: bool) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn dropdeg(mut self, dropdeg: bool) -> Self {
        self.dropdeg = dropdeg;
        self
    }

    pub fn keepaxes(mut self, keepaxes: impl IntoIterator<Item = usize>) -> Self {
        self.keepaxes = keepaxes.into_iter().collect();
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Parse the textual parameters and drop sub-parameters whose parent
    /// parameter is unset.
    pub fn build(self) -> Result<TaskConfig> {
        let bbox = self.bbox.as_deref().map(str::parse::<BoxRegion>).transpose()?;
        let mask = self.mask.as_deref().map(str::parse::<MaskExpr>).transpose()?;

        let stretch = if self.stretch && mask.is_none() {
            log::warn!("stretch is ignored without a mask");
            false
        } else {
            self.stretch
        };
        if !self.dropdeg && !self.keepaxes.is_empty() {
            log::warn!("keepaxes {:?} ignored because dropdeg is not set", self.keepaxes);
        }
        let degenerate = if self.dropdeg {
            DegenerateAxes::drop_except(self.keepaxes)
        } else {
            DegenerateAxes::Keep
        };
        let overwrite = if self.overwrite && self.outfile.is_none() {
            log::warn!("overwrite is ignored without an outfile");
            false
        } else {
            self.overwrite
        };

        Ok(TaskConfig {
            imagename: self.imagename,
            outfile: self.outfile,
            region: self.region,
            bbox,
            mask,
            options: SubimageOptions::new().stretch(stretch).degenerate(degenerate),
            overwrite,
            verbose: self.verbose,
        })
    }
}

/// Outcome of one task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub input_shape: Vec<usize>,
    pub output_shape: Vec<usize>,
    pub masked_pixels: usize,
    pub written: Option<PathBuf>,
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} -> {:?}, {} masked pixel(s)",
            self.input_shape, self.output_shape, self.masked_pixels
        )?;
        match &self.written {
            Some(path) => write!(f, ", written to {}", path.display()),
            None => write!(f, ", not written"),
        }
    }
}

/// Load the input and cut the configured sub-image out of it.
///
/// Returns the source shape alongside the result.
pub fn extract(
    config: &TaskConfig,
    source: &dyn ImageSource,
) -> Result<(Vec<usize>, SubImage<f32>)> {
    let image = source.load(&config.imagename)?;
    let shape = image.shape().to_vec();
    if config.verbose {
        log::info!(
            "{}: {} image, shape {:?}",
            config.imagename.display(),
            <f32 as Pixel>::KIND,
            shape
        );
    }

    let mut region = match &config.region {
        Some(text) => RegionSpec::parse_for_shape(text, &shape)?,
        None => RegionSpec::full(&shape),
    };
    if let Some(bbox) = &config.bbox {
        region = bbox.apply(region)?;
    }
    if config.verbose {
        log::info!("selecting region {region}");
    }

    let mask = match &config.mask {
        Some(expr) => {
            let mask = expr.evaluate(source)?;
            if config.verbose {
                log::info!("mask {expr}: shape {:?}", mask.shape());
            }
            Some(mask)
        }
        None => None,
    };

    let sub = subimage(&image, &region, mask.as_ref().map(|m| m.view()), &config.options)?;
    if config.verbose {
        log::info!(
            "sub-image shape {:?}, {} masked pixel(s)",
            sub.shape(),
            sub.masked_count()
        );
    }
    Ok((shape, sub))
}

/// Run the task end to end, writing to `sink` when an outfile is set.
pub fn run_task(
    config: &TaskConfig,
    source: &dyn ImageSource,
    sink: &dyn ImageSink,
) -> Result<TaskReport> {
    let (input_shape, sub) = extract(config, source)?;
    let written = match &config.outfile {
        Some(path) => {
            write_output(sink, path, &sub, config)?;
            Some(path.clone())
        }
        None => None,
    };
    Ok(TaskReport {
        input_shape,
        output_shape: sub.shape().to_vec(),
        masked_pixels: sub.masked_count(),
        written,
    })
}

fn write_output(
    sink: &dyn ImageSink,
    path: &Path,
    sub: &SubImage<f32>,
    config: &TaskConfig,
) -> Result<()> {
    sink.write(path, sub, config.overwrite)?;
    if config.verbose {
        log::info!("wrote {}", path.display());
    }
    Ok(())
}
