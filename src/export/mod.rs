mod stl;

pub use stl::{export_stl, write_stl, StlExport, STL_HEADER_LEN, STL_RECORD_LEN};
