mod category_dto;

pub use category_dto::{
    CategoryEditFormDto, CategoryFormOptionsDto, CategoryMembershipDto, CategoryResponseDto,
    CategorySummaryDto, CreateCategoryDto, ListCategoriesQuery, UpdateCategoryDto,
};
