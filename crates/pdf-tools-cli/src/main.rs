use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_compose::{ImageAsset, LayoutSettings, PageNumberPosition, PageNumberSpec, PdfAsset};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdft", about = "PDF tools CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert images to a PDF, one image per page
    Images {
        /// Input image file(s), in page order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Clockwise rotation applied to every image, in degrees
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        rotate: f32,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Insert images as new pages into an existing PDF
    AddPages {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Page to insert as POSITION=IMAGE (1-based), repeatable
        #[arg(long = "insert", required = true, value_parser = parse_insertion)]
        insertions: Vec<(usize, PathBuf)>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Clockwise rotation applied to every image, in degrees
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        rotate: f32,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Merge PDFs into one document
    Merge {
        /// Input PDF file(s), in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Padding around each page
        #[arg(long, default_value = "none", value_enum)]
        margin: MarginArg,
    },

    /// Stamp page numbers on every page
    Number {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Label style
        #[arg(long, default_value = "arabic", value_enum)]
        format: FormatArg,

        /// Label position, e.g. bottom-center or top-right
        #[arg(long, default_value = "bottom-center", value_parser = parse_position)]
        position: PageNumberPosition,

        /// Number printed on the first page
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        start: u32,

        #[command(flatten)]
        page: PageArgs,
    },
}

/// Output page setup shared by the image and numbering commands
#[derive(clap::Args)]
struct PageArgs {
    /// Output paper size
    #[arg(long, default_value = "a4", value_enum)]
    paper: PaperArg,

    /// Output orientation
    #[arg(long, default_value = "portrait", value_enum)]
    orientation: OrientationArg,

    /// Padding around page content
    #[arg(long, default_value = "none", value_enum)]
    margin: MarginArg,

    /// Image resolution used to size content
    #[arg(long, default_value = "300")]
    dpi: u32,
}

impl From<PageArgs> for LayoutSettings {
    fn from(args: PageArgs) -> Self {
        LayoutSettings::new(args.paper.into(), args.margin.into(), args.orientation.into())
            .with_dpi(args.dpi)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
    Fit,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum MarginArg {
    None,
    Small,
    Big,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Arabic,
    Roman,
    PageN,
    PageNOfM,
    NSlashM,
}

impl From<PaperArg> for pdf_compose::PageSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::Letter => Self::Letter,
            PaperArg::Fit => Self::Fit,
        }
    }
}

impl From<OrientationArg> for pdf_compose::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<MarginArg> for pdf_compose::Margin {
    fn from(arg: MarginArg) -> Self {
        match arg {
            MarginArg::None => Self::None,
            MarginArg::Small => Self::Small,
            MarginArg::Big => Self::Big,
        }
    }
}

impl From<FormatArg> for pdf_compose::PageNumberFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Arabic => Self::Arabic,
            FormatArg::Roman => Self::Roman,
            FormatArg::PageN => Self::PageN,
            FormatArg::PageNOfM => Self::PageNOfM,
            FormatArg::NSlashM => Self::NSlashM,
        }
    }
}

fn parse_insertion(value: &str) -> std::result::Result<(usize, PathBuf), String> {
    let (position, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected POSITION=IMAGE, got '{}'", value))?;
    let position = position
        .trim()
        .parse()
        .map_err(|_| format!("invalid page position '{}'", position))?;
    if path.is_empty() {
        return Err(format!("missing image path in '{}'", value));
    }
    Ok((position, PathBuf::from(path)))
}

fn parse_position(value: &str) -> std::result::Result<PageNumberPosition, String> {
    value.parse().map_err(|e: pdf_compose::ComposeError| e.to_string())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn read_image(path: &Path, rotate: f32) -> Result<ImageAsset> {
    let bytes = read_file(path).await?;
    Ok(ImageAsset::new(bytes, display_name(path)).with_rotation(rotate))
}

async fn read_pdf(path: &Path) -> Result<PdfAsset> {
    let bytes = read_file(path).await?;
    Ok(PdfAsset::new(bytes, display_name(path)))
}

async fn write_output(path: &Path, bytes: Vec<u8>) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Images {
            input,
            output,
            rotate,
            page,
        } => {
            let mut images = Vec::with_capacity(input.len());
            for path in &input {
                images.push(read_image(path, rotate).await?);
            }

            let pdf = pdf_compose::images_to_pdf(images, page.into()).await?;
            write_output(&output, pdf).await?;
            println!("Converted {} images → {}", input.len(), output.display());
        }

        Commands::AddPages {
            input,
            insertions,
            output,
            rotate,
            page,
        } => {
            let pdf = read_pdf(&input).await?;
            let mut images = Vec::with_capacity(insertions.len());
            for (position, path) in &insertions {
                images.push(read_image(path, rotate).await?.at_position(*position));
            }

            let out = pdf_compose::add_pages(pdf, images, page.into()).await?;
            write_output(&output, out).await?;
            println!("Inserted {} pages → {}", insertions.len(), output.display());
        }

        Commands::Merge {
            input,
            output,
            margin,
        } => {
            let mut pdfs = Vec::with_capacity(input.len());
            for path in &input {
                pdfs.push(read_pdf(path).await?);
            }

            let out = pdf_compose::merge_pdfs(pdfs, margin.into()).await?;
            write_output(&output, out).await?;
            println!("Merged {} documents → {}", input.len(), output.display());
        }

        Commands::Number {
            input,
            output,
            format,
            position,
            start,
            page,
        } => {
            let pdf = read_pdf(&input).await?;
            let numbering = PageNumberSpec {
                format: format.into(),
                position,
                start: start as usize,
            };

            let out = pdf_compose::add_page_numbers(pdf, page.into(), numbering).await?;
            write_output(&output, out).await?;
            println!("Numbered pages → {}", output.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    run(Cli::parse()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, Rgb([20, 200, 20]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    fn page_count(path: &Path) -> usize {
        lopdf::Document::load(path).unwrap().get_pages().len()
    }

    async fn pdft(args: &[&str]) -> Result<()> {
        let mut argv = vec!["pdft"];
        argv.extend_from_slice(args);
        run(Cli::try_parse_from(argv)?).await
    }

    #[test]
    fn test_parse_insertion() {
        assert_eq!(
            parse_insertion("3=cover.png").unwrap(),
            (3, PathBuf::from("cover.png"))
        );
        assert!(parse_insertion("cover.png").is_err());
        assert!(parse_insertion("x=cover.png").is_err());
        assert!(parse_insertion("2=").is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("top-left").unwrap().to_string(), "top-left");
        assert!(parse_position("left").is_err());
    }

    #[test]
    fn test_start_must_be_positive() {
        let parsed = Cli::try_parse_from(["pdft", "number", "-i", "a.pdf", "-o", "b.pdf", "--start", "0"]);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_commands_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", 40, 20);
        let b = write_png(dir.path(), "b.png", 20, 40);
        let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();

        let images = path("images.pdf");
        pdft(&[
            "images",
            "-i",
            &a.to_string_lossy(),
            &b.to_string_lossy(),
            "-o",
            &images,
            "--paper",
            "fit",
            "--margin",
            "small",
        ])
        .await
        .unwrap();
        assert_eq!(page_count(Path::new(&images)), 2);

        let inserted = path("inserted.pdf");
        pdft(&[
            "add-pages",
            "-i",
            &images,
            "--insert",
            &format!("1={}", a.display()),
            "-o",
            &inserted,
        ])
        .await
        .unwrap();
        assert_eq!(page_count(Path::new(&inserted)), 3);

        let merged = path("merged.pdf");
        pdft(&["merge", "-i", &images, &inserted, "-o", &merged])
            .await
            .unwrap();
        assert_eq!(page_count(Path::new(&merged)), 5);

        let numbered = path("numbered.pdf");
        pdft(&[
            "number",
            "-i",
            &merged,
            "-o",
            &numbered,
            "--format",
            "page-n-of-m",
            "--position",
            "top-right",
        ])
        .await
        .unwrap();
        assert_eq!(page_count(Path::new(&numbered)), 5);
    }

    #[tokio::test]
    async fn test_missing_input_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        let out = dir.path().join("out.pdf");

        let err = pdft(&[
            "images",
            "-i",
            &missing.to_string_lossy(),
            "-o",
            &out.to_string_lossy(),
        ])
        .await
        .unwrap_err();
        assert!(err.to_string().contains("nope.png"));
        assert!(!out.exists());
    }
}
