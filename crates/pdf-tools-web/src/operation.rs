use pdf_artifacts::ArtifactToken;

/// The four tools the service offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ImageToPdf,
    AddPages,
    Merge,
    PageNumbers,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::ImageToPdf,
        Operation::AddPages,
        Operation::Merge,
        Operation::PageNumbers,
    ];

    /// First path segment of the form and download pages
    pub fn slug(self) -> &'static str {
        match self {
            Operation::ImageToPdf => "imagetopdf",
            Operation::AddPages => "add-pages-pdf",
            Operation::Merge => "merge-pdf",
            Operation::PageNumbers => "add-page-numbers",
        }
    }

    /// Case-insensitive, so `/imageToPDF/...` links keep working
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.slug().eq_ignore_ascii_case(slug))
    }

    pub fn title(self) -> &'static str {
        match self {
            Operation::ImageToPdf => "Image to PDF",
            Operation::AddPages => "Add Pages to PDF",
            Operation::Merge => "Merge PDF",
            Operation::PageNumbers => "Add Page Numbers",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::ImageToPdf => "Turn images into a PDF, one image per page.",
            Operation::AddPages => "Insert images as new pages at chosen positions.",
            Operation::Merge => "Combine several PDFs into one document.",
            Operation::PageNumbers => "Stamp a page number on every page.",
        }
    }

    pub fn post_path(self) -> &'static str {
        match self {
            Operation::ImageToPdf => "/imageToPDFPost",
            Operation::AddPages => "/addPagesToPDF",
            Operation::Merge => "/mergePDFPost",
            Operation::PageNumbers => "/addPageNumberToPDFPost",
        }
    }

    pub fn form_path(self) -> String {
        format!("/{}", self.slug())
    }

    pub fn download_path(self, token: &ArtifactToken) -> String {
        format!("/{}/download/{}", self.slug(), token)
    }

    pub fn file_path(self, token: &ArtifactToken) -> String {
        format!("/{}/download/file/{}", self.slug(), token)
    }
}
