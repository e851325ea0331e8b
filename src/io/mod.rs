pub mod json_writer;
pub mod nifti;
pub mod summary;
pub mod tsv_writer;
