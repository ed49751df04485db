use crate::models::{AnnotatedPaper, College, ImageRef};

/// Search text as the store should see it. Absent or empty means "match everything".
pub fn search_filter(search: Option<&str>) -> Option<&str> {
    search.filter(|text| !text.is_empty())
}

/// Every college's gallery, concatenated in college order.
pub fn gallery_images(colleges: Vec<College>) -> Vec<ImageRef> {
    colleges
        .into_iter()
        .flat_map(|college| college.gallery)
        .collect()
}

/// Every college's research papers, each tagged with the college's name.
pub fn research_papers(colleges: Vec<College>) -> Vec<AnnotatedPaper> {
    colleges
        .into_iter()
        .flat_map(|college| {
            let college_name = college.name;
            college.research_papers.into_iter().map(move |mut paper| {
                paper.extra.remove("collegeName");
                AnnotatedPaper {
                    paper,
                    college_name: college_name.clone(),
                }
            })
        })
        .collect()
}
