pub fn upload_success_fixture() -> &'static str {
    return r#"{
  "message": "Processed 1 file(s) in workspace 'acme'",
  "total_chunks": 12,
  "results": [
    {
      "filename": "lease.pdf",
      "status": "success",
      "chunks_created": 12
    }
  ]
}"#;
}

pub fn upload_item_error_fixture() -> &'static str {
    return r#"{
  "message": "Processed 1 file(s) in workspace 'acme'",
  "total_chunks": 0,
  "results": [
    {
      "filename": "notes.txt",
      "status": "error",
      "message": "Only PDF files are supported"
    }
  ]
}"#;
}

pub fn query_fixture() -> &'static str {
    return r#"{
  "answer": "The initial term is 24 months [1], renewable once [2].",
  "sources": [
    {
      "source_num": 1,
      "document": "lease.pdf",
      "page": 3,
      "source": "uploads/lease.pdf",
      "excerpt": "The initial term of this lease is twenty-four (24) months."
    },
    {
      "source_num": 2,
      "document": "lease.pdf",
      "page": null,
      "source": "uploads/lease.pdf",
      "excerpt": "Tenant may renew this lease for one additional term."
    }
  ]
}"#;
}
