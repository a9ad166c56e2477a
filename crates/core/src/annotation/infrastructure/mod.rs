pub mod contour_annotator;
