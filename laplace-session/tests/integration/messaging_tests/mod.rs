mod test_viewer_accumulates_tracks;
